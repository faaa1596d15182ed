use super::xml_utils::{XmlResult, XmlWriter};
use crate::core::schema::{DocumentSink, walk};
use crate::core::{IssuerConfig, Rps, RpsError};

/// Render the `<Rps>` element for `rps`, with the `Prestador` block taken
/// from `issuer` when given.
///
/// The output has no XML declaration and no whitespace between elements,
/// ready to be embedded in a SOAP envelope. Fails on the first missing
/// mandatory element or malformed amount; nothing is returned in that case.
pub fn to_rps_xml(rps: &Rps, issuer: Option<&IssuerConfig>) -> XmlResult {
    let mut sink = XmlSink(XmlWriter::new());
    walk(rps, issuer, &mut sink)?;
    sink.0.into_string()
}

struct XmlSink(XmlWriter);

impl DocumentSink for XmlSink {
    fn start(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> Result<(), RpsError> {
        self.0.start_element_with_attrs(tag, attrs).map(drop)
    }

    fn end(&mut self, tag: &'static str) -> Result<(), RpsError> {
        self.0.end_element(tag).map(drop)
    }

    fn empty(&mut self, tag: &'static str) -> Result<(), RpsError> {
        self.0.empty_element(tag).map(drop)
    }

    fn leaf(&mut self, tag: &'static str, text: &str) -> Result<(), RpsError> {
        self.0.text_element(tag, text).map(drop)
    }

    fn violation(&mut self, err: RpsError) -> Result<(), RpsError> {
        Err(err)
    }
}

/// Renders one RPS record, optionally merging in the issuer block.
///
/// ```
/// use nfse_tinus::core::*;
/// use nfse_tinus::rps::DocumentBuilder;
/// use chrono::NaiveDate;
///
/// let issued = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 30, 0).unwrap();
/// let rps = RpsBuilder::new("42", "A", issued)
///     .special_tax_regime(SpecialTaxRegime::Estimate)
///     .service(ServiceBuilder::new(ValuesBuilder::new("1500").build(), "01.07", "620910000", "Suporte").build())
///     .build()
///     .unwrap();
/// let issuer = IssuerConfig::with_cnpj("99999999000191", "123");
///
/// let xml = DocumentBuilder::new(&rps).attach_issuer_config(&issuer).render().unwrap();
/// assert!(xml.starts_with(r#"<Rps><InfRps id="42">"#));
/// assert!(xml.contains("<InscricaoMunicipal>0000123</InscricaoMunicipal>"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DocumentBuilder<'a> {
    rps: &'a Rps,
    issuer: Option<&'a IssuerConfig>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(rps: &'a Rps) -> Self {
        Self { rps, issuer: None }
    }

    /// Include the `Prestador` block built from `config`. Without it the
    /// block is left out.
    pub fn attach_issuer_config(mut self, config: &'a IssuerConfig) -> Self {
        self.issuer = Some(config);
        self
    }

    pub fn render(&self) -> XmlResult {
        to_rps_xml(self.rps, self.issuer)
    }
}
