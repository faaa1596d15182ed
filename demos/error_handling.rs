use chrono::NaiveDate;
use nfse_tinus::core::*;
use nfse_tinus::rps;

fn main() {
    let issued = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();

    // ── 1. Builder error: no service ─────────────────────────────────
    println!("=== Builder Error ===");
    match RpsBuilder::new("1001", "A", issued).build() {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  Build failed: {}", e),
    }

    // ── 2. Validation errors: every problem at once ──────────────────
    println!("\n=== Validation Errors ===");
    let rps = RpsBuilder::new("1001", "A", issued)
        // No special tax regime, blank description, payer without tax id
        .service(ServiceBuilder::new(ValuesBuilder::new("1500").build(), "01.07", "620910000", " ").build())
        .payer(PayerBuilder::with_cpf("Maria Silva", "").build())
        .build_unchecked()
        .unwrap();

    let errors = validate_rps(&rps, None);
    println!("  Found {} validation errors:", errors.len());
    for e in &errors {
        println!("    {}", e);
    }

    // ── 3. Render error: first problem in document order ────────────
    println!("\n=== Render Error ===");
    match rps::to_rps_xml(&rps, None) {
        Ok(xml) => println!("  unexpected success: {xml}"),
        Err(e) => {
            println!("  Render failed: {}", e);
            if let Some(path) = e.path() {
                println!("  Element: {}", path);
            }
        }
    }

    // ── 4. Formatting error: amount that is not a number ─────────────
    println!("\n=== Formatting Error ===");
    let mut rps = RpsBuilder::new("1002", "A", issued)
        .special_tax_regime(SpecialTaxRegime::Estimate)
        .service(ServiceBuilder::new(ValuesBuilder::new("100").build(), "01.07", "620910000", "Suporte").build())
        .build()
        .unwrap();
    rps.service.values.rate = Some(Amount::new("5%"));

    match rps::to_rps_xml(&rps, None) {
        Ok(xml) => println!("  unexpected success: {xml}"),
        Err(RpsError::Formatting { path, value }) => {
            println!("  {} holds {:?}, which is not a decimal number", path, value);
        }
        Err(e) => println!("  Render failed: {}", e),
    }
}
