fn main() {
    if let Err(e) = clinical_diagnosis::run() {
        eprintln!("clinical-diagnosis: {e}");
        std::process::exit(1);
    }
}
