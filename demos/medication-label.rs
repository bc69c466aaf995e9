use rx_label::{render, Info, LabelContent, RenderConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=rx_label=debug shows the plan the renderer settled on
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // describe what goes on the label
    let mut label = LabelContent::builder()
        .medication_identifier("MED1")
        .patient_name("Doe, Jane")
        .medication_name("Amoxicillin")
        .dose("500 mg")
        .dose_amount(500.0)
        .dispense_amount(30.0)
        .fill_from_concentration(50.0)
        .sig("Take one capsule twice daily")
        .prescriber_name("Dr. Smith")
        .prescriber_phone("555-0100")
        .clinic_address("1 Main St, Springfield")
        .pharmacy_name("Beaker Pharmacy")
        .pharmacy_identifier("PH-0042")
        .build();

    // the QR code points at the medication's page
    let url = label.payload_url("example.com").expect("valid url");
    label.code_payload = Some(url.into());

    // the simple layout at the default 144 DPI
    let simple = render(&label, &RenderConfig::default()).expect("can render simple label");
    std::fs::write("label-simple.pdf", simple).expect("can write simple label");

    // and the rich layout at print resolution, with a title in the document info
    let mut config = RenderConfig::rich(300.0);
    let mut info = Info::new();
    info.title("Amoxicillin 500 mg").subject("Doe, Jane");
    config.info = Some(info);
    let rich = render(&label, &config).expect("can render rich label");
    std::fs::write("label-rich.pdf", rich).expect("can write rich label");
}
