use chrono::NaiveDate;
use nfse_tinus::core::*;
use nfse_tinus::rps::DocumentBuilder;
use rust_decimal_macros::dec;

fn main() {
    let issued = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();

    // Software development service taxed in Natal, ISS at 5%
    let rps = RpsBuilder::new("1001", "A", issued)
        .special_tax_regime(SpecialTaxRegime::MunicipalMicroEnterprise)
        .simples_nacional(true)
        .service(
            ServiceBuilder::new(
                ValuesBuilder::new(dec!(4500))
                    .deductions(dec!(0))
                    .iss_withheld(false)
                    .iss(dec!(225))
                    .tax_base(dec!(4500))
                    .rate(dec!(0.05))
                    .net_value("4500.00")
                    .build(),
                "01.07",
                "620910000",
                "Desenvolvimento de software sob encomenda",
            )
            .cnae_code("6201501")
            .build(),
        )
        .payer(
            PayerBuilder::with_cnpj("Cliente Exemplo Ltda", "11222333000181")
                .municipal_registration("4521")
                .address(
                    AddressBuilder::new()
                        .street("Avenida Hermes da Fonseca")
                        .number("1000")
                        .district("Tirol")
                        .municipality_code("2408102")
                        .state("RN")
                        .postal_code("59020000")
                        .build(),
                )
                .build(),
        )
        .build()
        .expect("RPS should be valid");

    let issuer = IssuerConfig::with_cnpj("99999999000191", "1733160");
    let xml = DocumentBuilder::new(&rps)
        .attach_issuer_config(&issuer)
        .render()
        .expect("RPS should render");

    println!("RPS:    {} / {}", rps.identification.number, rps.identification.series);
    println!("Issued: {}", issued.format(ISSUE_DATE_FORMAT));
    println!("Payer:  {}", rps.payer.as_ref().unwrap().legal_name);
    println!("---");
    println!("{xml}");
}
