/// Display version information
pub fn execute() {
    println!("leakcheck {}", env!("CARGO_PKG_VERSION"));
    println!("Private breach lookup (PSI-sum over elliptic curves and Paillier)");
}
