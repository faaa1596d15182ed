#![cfg(feature = "rps")]

use chrono::{NaiveDate, NaiveDateTime};
use nfse_tinus::core::*;
use nfse_tinus::rps::{self, DocumentBuilder};
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal_macros::dec;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

/// Only the mandatory elements populated.
fn minimal() -> Rps {
    RpsBuilder::new("7", "B", at(2024, 1, 2, 3, 4, 5))
        .special_tax_regime(SpecialTaxRegime::MunicipalMicroEnterprise)
        .service(
            ServiceBuilder::new(
                ValuesBuilder::new("100").build(),
                "01.07",
                "010701",
                "Consultoria",
            )
            .build(),
        )
        .build()
        .unwrap()
}

/// Every optional element populated.
fn full() -> Rps {
    let values = ValuesBuilder::new("1234.5")
        .deductions("10")
        .pis(dec!(6.5))
        .cofins("30")
        .inss("11.111")
        .ir("15")
        .csll("10.005")
        .iss_withheld(false)
        .iss("61.725")
        .iss_withheld_value("0")
        .other_withholdings("1")
        .tax_base("1224.5")
        .rate("5")
        .net_value("1100.25")
        .unconditional_discount("0.5")
        .conditional_discount("0.25")
        .municipality_code("2403251")
        .build();

    let mut payer = PayerBuilder::with_cnpj("Cliente & Filhos Ltda", "11222333000181")
        .municipal_registration("123")
        .address(
            AddressBuilder::new()
                .street("Rua das Flores")
                .number("100")
                .complement("Sala 2")
                .district("Centro")
                .municipality_code("2403251")
                .state("RN")
                .postal_code("59000000")
                .build(),
        )
        .build();
    payer.cpf = Some("12345678909".into());

    RpsBuilder::new("1001", "A", at(2024, 6, 15, 10, 30, 0))
        .special_tax_regime(SpecialTaxRegime::SmallEnterprise)
        .simples_nacional(true)
        .cultural_incentive(false)
        .service(
            ServiceBuilder::new(values, "01.07", "010701", "Desenvolvimento de sistemas")
                .cnae_code("6209100")
                .municipality_code("2403251")
                .build(),
        )
        .payer(payer)
        .intermediary(
            IntermediaryBuilder::with_cpf("Agência Intermediadora", "98765432100")
                .municipal_registration("4567")
                .build(),
        )
        .construction("OBRA-77", "ART-2024-001")
        .build()
        .unwrap()
}

fn issuer() -> IssuerConfig {
    IssuerConfig::with_cnpj("99999999000191", "1733160024")
}

/// Paths of every element in the document, in order.
fn element_paths(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<String> = Vec::new();
    let mut paths = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                paths.push(stack.join("/"));
            }
            Ok(Event::Empty(e)) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                paths.push(stack.join("/"));
                stack.pop();
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("invalid XML: {e}"),
            _ => {}
        }
    }
    paths
}

/// (path, text) for every text node in the document.
fn leaf_values(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<String> = Vec::new();
    let mut leaves = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                leaves.push((stack.join("/"), text));
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("invalid XML: {e}"),
            _ => {}
        }
    }
    leaves
}

fn value_at<'a>(leaves: &'a [(String, String)], path: &str) -> Option<&'a str> {
    leaves
        .iter()
        .find(|(p, _)| p == path)
        .map(|(_, v)| v.as_str())
}

// --- Document shape ---

#[test]
fn minimal_document_snapshot() {
    let xml = rps::to_rps_xml(&minimal(), None).unwrap();
    insta::assert_snapshot!(xml, @r#"<Rps><InfRps id="7"><IdentificacaoRps><Numero>7</Numero><Serie>B</Serie><Tipo>1</Tipo></IdentificacaoRps><DataEmissao>2024-01-02T03:04:05</DataEmissao><NaturezaOperacao>1</NaturezaOperacao><RegimeEspecialTributacao>1</RegimeEspecialTributacao><OptanteSimplesNacional>2</OptanteSimplesNacional><Status>1</Status><Servico><Valores><ValorServicos>100.00</ValorServicos></Valores><ItemListaServico>01.07</ItemListaServico><CodigoTributacaoMunicipio>010701</CodigoTributacaoMunicipio><Discriminacao>Consultoria</Discriminacao></Servico></InfRps></Rps>"#);
}

#[test]
fn minimal_document_has_only_mandatory_elements_in_order() {
    let xml = rps::to_rps_xml(&minimal(), None).unwrap();
    assert_eq!(
        element_paths(&xml),
        [
            "Rps",
            "Rps/InfRps",
            "Rps/InfRps/IdentificacaoRps",
            "Rps/InfRps/IdentificacaoRps/Numero",
            "Rps/InfRps/IdentificacaoRps/Serie",
            "Rps/InfRps/IdentificacaoRps/Tipo",
            "Rps/InfRps/DataEmissao",
            "Rps/InfRps/NaturezaOperacao",
            "Rps/InfRps/RegimeEspecialTributacao",
            "Rps/InfRps/OptanteSimplesNacional",
            "Rps/InfRps/Status",
            "Rps/InfRps/Servico",
            "Rps/InfRps/Servico/Valores",
            "Rps/InfRps/Servico/Valores/ValorServicos",
            "Rps/InfRps/Servico/ItemListaServico",
            "Rps/InfRps/Servico/CodigoTributacaoMunicipio",
            "Rps/InfRps/Servico/Discriminacao",
        ]
    );
}

#[test]
fn full_document_exact() {
    let xml = rps::to_rps_xml(&full(), Some(&issuer())).unwrap();
    let expected = concat!(
        r#"<Rps><InfRps id="1001">"#,
        "<IdentificacaoRps><Numero>1001</Numero><Serie>A</Serie><Tipo>1</Tipo></IdentificacaoRps>",
        "<DataEmissao>2024-06-15T10:30:00</DataEmissao>",
        "<NaturezaOperacao>1</NaturezaOperacao>",
        "<RegimeEspecialTributacao>6</RegimeEspecialTributacao>",
        "<OptanteSimplesNacional>1</OptanteSimplesNacional>",
        "<IncentivadorCultural>2</IncentivadorCultural>",
        "<Status>1</Status>",
        "<Servico><Valores>",
        "<ValorServicos>1234.50</ValorServicos>",
        "<ValorDeducoes>10.00</ValorDeducoes>",
        "<ValorPis>6.50</ValorPis>",
        "<ValorCofins>30.00</ValorCofins>",
        "<ValorInss>11.11</ValorInss>",
        "<ValorIr>15.00</ValorIr>",
        "<ValorCsll>10.01</ValorCsll>",
        "<IssRetido>2</IssRetido>",
        "<ValorIss>61.73</ValorIss>",
        "<ValorIssRetido>0</ValorIssRetido>",
        "<OutrasRetencoes>1.00</OutrasRetencoes>",
        "<BaseCalculo>1224.50</BaseCalculo>",
        "<Aliquota>5.0000</Aliquota>",
        "<ValorLiquidoNfse>1100.25</ValorLiquidoNfse>",
        "<DescontoIncondicionado>0.50</DescontoIncondicionado>",
        "<DescontoCondicionado>0.25</DescontoCondicionado>",
        "</Valores>",
        "<ItemListaServico>01.07</ItemListaServico>",
        "<CodigoCnae>6209100</CodigoCnae>",
        "<CodigoTributacaoMunicipio>010701</CodigoTributacaoMunicipio>",
        "<Discriminacao>Desenvolvimento de sistemas</Discriminacao>",
        "<CodigoMunicipio>2403251</CodigoMunicipio>",
        "</Servico>",
        "<Prestador><Cnpj>99999999000191</Cnpj><InscricaoMunicipal>1733160024</InscricaoMunicipal></Prestador>",
        "<Tomador><IdentificacaoTomador><CpfCnpj><Cnpj>11222333000181</Cnpj></CpfCnpj>",
        "<InscricaoMunicipal>0000123</InscricaoMunicipal></IdentificacaoTomador>",
        "<RazaoSocial>Cliente &amp; Filhos Ltda</RazaoSocial>",
        "<Endereco><Endereco>Rua das Flores</Endereco><Numero>100</Numero><Complemento>Sala 2</Complemento>",
        "<Bairro>Centro</Bairro><CodigoMunicipio>2403251</CodigoMunicipio><Uf>RN</Uf><Cep>59000000</Cep></Endereco>",
        "</Tomador>",
        "<IntermediarioServico><RazaoSocial>Agência Intermediadora</RazaoSocial>",
        "<CpfCnpj><Cpf>98765432100</Cpf></CpfCnpj><InscricaoMunicipal>0004567</InscricaoMunicipal></IntermediarioServico>",
        "<ConstrucaoCivil><CodigoObra>OBRA-77</CodigoObra><Art>ART-2024-001</Art></ConstrucaoCivil>",
        "</InfRps></Rps>",
    );
    assert_eq!(xml, expected);
}

#[test]
fn output_has_no_declaration_or_whitespace() {
    let xml = rps::to_rps_xml(&full(), Some(&issuer())).unwrap();
    assert!(!xml.starts_with("<?xml"));
    assert!(!xml.contains('\n'));
    assert!(!xml.contains("> <"));
}

#[test]
fn render_is_deterministic() {
    let rps = full();
    let a = rps::to_rps_xml(&rps, Some(&issuer())).unwrap();
    let b = rps::to_rps_xml(&rps, Some(&issuer())).unwrap();
    assert_eq!(a, b);
}

#[test]
fn document_builder_matches_free_function() {
    let rps = full();
    let config = issuer();
    let with = DocumentBuilder::new(&rps)
        .attach_issuer_config(&config)
        .render()
        .unwrap();
    assert_eq!(with, rps::to_rps_xml(&rps, Some(&config)).unwrap());

    let without = DocumentBuilder::new(&rps).render().unwrap();
    assert!(!without.contains("<Prestador>"));
}

// --- Round trip through a parser ---

#[test]
fn full_document_values_are_recoverable() {
    let xml = rps::to_rps_xml(&full(), Some(&issuer())).unwrap();
    let leaves = leaf_values(&xml);

    let cases = [
        ("Rps/InfRps/IdentificacaoRps/Numero", "1001"),
        ("Rps/InfRps/DataEmissao", "2024-06-15T10:30:00"),
        ("Rps/InfRps/Servico/Valores/ValorCsll", "10.01"),
        ("Rps/InfRps/Servico/Valores/Aliquota", "5.0000"),
        ("Rps/InfRps/Servico/CodigoMunicipio", "2403251"),
        ("Rps/InfRps/Prestador/InscricaoMunicipal", "1733160024"),
        ("Rps/InfRps/Tomador/RazaoSocial", "Cliente & Filhos Ltda"),
        ("Rps/InfRps/Tomador/Endereco/Uf", "RN"),
        ("Rps/InfRps/IntermediarioServico/CpfCnpj/Cpf", "98765432100"),
        ("Rps/InfRps/ConstrucaoCivil/Art", "ART-2024-001"),
    ];
    for (path, expected) in cases {
        assert_eq!(value_at(&leaves, path), Some(expected), "{path}");
    }

    // No element is ever written empty.
    assert!(leaves.iter().all(|(_, v)| !v.is_empty()));
}

#[test]
fn infrps_carries_number_as_id() {
    let xml = rps::to_rps_xml(&full(), None).unwrap();
    let mut reader = Reader::from_str(&xml);
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"InfRps" => {
                let id = e.try_get_attribute("id").unwrap().unwrap();
                assert_eq!(id.unescape_value().unwrap(), "1001");
                break;
            }
            Event::Eof => panic!("InfRps not found"),
            _ => {}
        }
    }
}

#[test]
fn omitted_optionals_are_structurally_absent() {
    let xml = rps::to_rps_xml(&minimal(), None).unwrap();
    let paths = element_paths(&xml);
    for absent in [
        "IncentivadorCultural",
        "ValorDeducoes",
        "Aliquota",
        "ValorLiquidoNfse",
        "CodigoCnae",
        "CodigoMunicipio",
        "Prestador",
        "Tomador",
        "IntermediarioServico",
        "ConstrucaoCivil",
    ] {
        assert!(
            !paths.iter().any(|p| p.ends_with(absent)),
            "{absent} should be absent"
        );
    }
}

// --- Formatting rules ---

#[test]
fn amounts_round_half_away_from_zero() {
    let mut rps = minimal();
    rps.service.values.services = Amount::new("1234.567");
    rps.service.values.rate = Some(Amount::new("1234.567"));
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains("<ValorServicos>1234.57</ValorServicos>"));
    assert!(xml.contains("<Aliquota>1234.5670</Aliquota>"));
}

#[test]
fn net_value_is_written_verbatim() {
    let mut rps = minimal();
    rps.service.values.net_value = Some(Amount::new("99.9"));
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains("<ValorLiquidoNfse>99.9</ValorLiquidoNfse>"));
}

#[test]
fn blank_optional_amount_is_omitted() {
    let mut rps = minimal();
    rps.service.values.pis = Some(Amount::new(""));
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(!xml.contains("ValorPis"));
}

#[test]
fn text_is_trimmed() {
    let mut rps = minimal();
    rps.service.description = "  Consultoria  ".into();
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains("<Discriminacao>Consultoria</Discriminacao>"));
}

// --- Issuer ---

#[test]
fn issuer_block_follows_service() {
    let xml = rps::to_rps_xml(&minimal(), Some(&IssuerConfig::with_cpf("12345678909", "55"))).unwrap();
    assert!(xml.contains(
        "</Servico><Prestador><Cpf>12345678909</Cpf><InscricaoMunicipal>0000055</InscricaoMunicipal></Prestador></InfRps>"
    ));
}

#[test]
fn issuer_without_tax_id_writes_registration_only() {
    let config = IssuerConfig {
        municipal_registration: "1".into(),
        ..IssuerConfig::default()
    };
    let xml = rps::to_rps_xml(&minimal(), Some(&config)).unwrap();
    assert!(xml.contains("<Prestador><InscricaoMunicipal>0000001</InscricaoMunicipal></Prestador>"));
}

#[test]
fn issuer_without_registration_is_a_violation() {
    let config = IssuerConfig {
        cnpj: Some("99999999000191".into()),
        ..IssuerConfig::default()
    };
    let err = rps::to_rps_xml(&minimal(), Some(&config)).unwrap_err();
    assert_eq!(err.path(), Some("InfRps/Prestador/InscricaoMunicipal"));
}

#[test]
fn infrps_id_matches_trimmed_number() {
    let mut rps = minimal();
    rps.identification.number = " 7 ".into();
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.starts_with(
        r#"<Rps><InfRps id="7"><IdentificacaoRps><Numero>7</Numero>"#
    ));
}

#[test]
fn oversized_amount_is_a_formatting_error() {
    let mut rps = minimal();
    rps.service.values.services = Amount::new("79228162514264337593543950335");
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert!(matches!(err, RpsError::Formatting { .. }));
    assert_eq!(err.path(), Some("InfRps/Servico/Valores/ValorServicos"));
}

#[test]
fn amount_with_digit_separator_is_a_formatting_error() {
    let mut rps = minimal();
    rps.service.values.services = Amount::new("1_000");
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert!(matches!(err, RpsError::Formatting { .. }));
}


// --- Payer ---

#[test]
fn payer_prefers_cnpj() {
    let xml = rps::to_rps_xml(&full(), None).unwrap();
    assert!(xml.contains("<CpfCnpj><Cnpj>11222333000181</Cnpj></CpfCnpj>"));
    assert!(!xml.contains("12345678909"));
}

#[test]
fn payer_without_address_gets_empty_endereco() {
    let mut rps = minimal();
    rps.payer = Some(PayerBuilder::with_cpf("Maria Silva", "12345678909").build());
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains(
        "<Tomador><IdentificacaoTomador><CpfCnpj><Cpf>12345678909</Cpf></CpfCnpj></IdentificacaoTomador><RazaoSocial>Maria Silva</RazaoSocial><Endereco/></Tomador>"
    ));
}

#[test]
fn partial_address_omits_missing_leaves() {
    let mut rps = minimal();
    rps.payer = Some(
        PayerBuilder::with_cpf("Maria Silva", "12345678909")
            .address(AddressBuilder::new().district("Centro").postal_code("59000000").build())
            .build(),
    );
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains("<Endereco><Bairro>Centro</Bairro><Cep>59000000</Cep></Endereco>"));
}

#[test]
fn payer_missing_legal_name_is_a_violation() {
    let mut rps = minimal();
    rps.payer = Some(PayerBuilder::with_cnpj("", "11222333000181").build());
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert_eq!(err.path(), Some("InfRps/Tomador/RazaoSocial"));
}

#[test]
fn payer_with_empty_cnpj_does_not_fall_back_to_cpf() {
    let mut rps = minimal();
    let mut payer = PayerBuilder::with_cpf("Maria Silva", "12345678909").build();
    payer.cnpj = Some(String::new());
    rps.payer = Some(payer);
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert_eq!(
        err.path(),
        Some("InfRps/Tomador/IdentificacaoTomador/CpfCnpj/Cnpj")
    );
}

// --- Intermediary and construction site ---

#[test]
fn intermediary_prefers_cnpj() {
    let mut rps = minimal();
    let mut intermediary = IntermediaryBuilder::with_cnpj("Agência", "11222333000181")
        .municipal_registration("4521")
        .build();
    intermediary.cpf = Some("12345678909".into());
    rps.intermediary = Some(intermediary);
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains(
        "<IntermediarioServico><RazaoSocial>Agência</RazaoSocial><CpfCnpj><Cnpj>11222333000181</Cnpj></CpfCnpj><InscricaoMunicipal>0004521</InscricaoMunicipal></IntermediarioServico>"
    ));
    assert!(!xml.contains("12345678909"));
}

#[test]
fn intermediary_without_registration() {
    let mut rps = minimal();
    rps.intermediary = Some(IntermediaryBuilder::with_cnpj("Agência", "11222333000181").build());
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains(
        "<IntermediarioServico><RazaoSocial>Agência</RazaoSocial><CpfCnpj><Cnpj>11222333000181</Cnpj></CpfCnpj></IntermediarioServico>"
    ));
}

#[test]
fn construction_site_requires_art() {
    let mut rps = minimal();
    rps.construction = Some(ConstructionSite {
        work_code: "OBRA-1".into(),
        art: String::new(),
    });
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert!(matches!(err, RpsError::SchemaViolation { .. }));
    assert_eq!(err.path(), Some("InfRps/ConstrucaoCivil/Art"));
}

// --- Service municipality gate ---

#[test]
fn service_municipality_needs_values_gate() {
    let mut rps = minimal();
    rps.service.municipality_code = Some("2403251".into());
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(!xml.contains("CodigoMunicipio"));

    rps.service.values.municipality_code = Some("2403251".into());
    let xml = rps::to_rps_xml(&rps, None).unwrap();
    assert!(xml.contains("<Discriminacao>Consultoria</Discriminacao><CodigoMunicipio>2403251</CodigoMunicipio></Servico>"));
}

#[test]
fn gate_without_service_municipality_is_a_violation() {
    let mut rps = minimal();
    rps.service.values.municipality_code = Some("2403251".into());
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert_eq!(err.path(), Some("InfRps/Servico/CodigoMunicipio"));
}

// --- Failures ---

#[test]
fn missing_description_names_discriminacao() {
    let mut rps = minimal();
    rps.service.description.clear();
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    match &err {
        RpsError::SchemaViolation { path } => assert_eq!(path, "InfRps/Servico/Discriminacao"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Discriminacao"));
}

#[test]
fn missing_issue_date_is_a_violation() {
    let mut rps = minimal();
    rps.issue_date = None;
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert_eq!(err.path(), Some("InfRps/DataEmissao"));
}

#[test]
fn non_numeric_amount_is_a_formatting_error() {
    let mut rps = minimal();
    rps.service.values.iss = Some(Amount::new("dez reais"));
    match rps::to_rps_xml(&rps, None).unwrap_err() {
        RpsError::Formatting { path, value } => {
            assert_eq!(path, "InfRps/Servico/Valores/ValorIss");
            assert_eq!(value, "dez reais");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_numeric_rate_is_a_formatting_error() {
    let mut rps = minimal();
    rps.service.values.rate = Some(Amount::new("5%"));
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert!(matches!(err, RpsError::Formatting { .. }));
}

#[test]
fn first_violation_in_document_order_wins() {
    let mut rps = minimal();
    rps.identification.series.clear();
    rps.service.description.clear();
    let err = rps::to_rps_xml(&rps, None).unwrap_err();
    assert_eq!(err.path(), Some("InfRps/IdentificacaoRps/Serie"));
}

#[test]
fn renders_concurrently() {
    let rps = full();
    let config = issuer();
    let expected = rps::to_rps_xml(&rps, Some(&config)).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| rps::to_rps_xml(&rps, Some(&config)).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
