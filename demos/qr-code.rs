use rx_label::{medication_url, qr};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // the identifier can be given on the command line
    let id = std::env::args().nth(1).unwrap_or_else(|| "MED1".to_string());
    let url = medication_url("example.com", &id).expect("valid url");

    // a code sized for a 300 DPI printer
    let png = qr::generate_from_url(&url, qr::scale_for_dpi(300.0)).expect("can encode url");
    std::fs::write("qr-code.png", png).expect("can write png");
    println!("wrote qr-code.png for {url}");
}
