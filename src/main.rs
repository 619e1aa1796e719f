fn main() {
    medscan_normalize::cli::run();
}
