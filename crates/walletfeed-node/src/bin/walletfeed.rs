fn main() -> walletfeed_node::Result<()> {
    walletfeed_node::run()
}
