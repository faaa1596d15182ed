//! XML rendering of RPS records for the Tinus NFS-e web service.
//!
//! Produces the `<Rps>` fragment that the transport layer wraps in its SOAP
//! envelope. Element order, optional-element elision and number formatting
//! follow the Tinus layout exactly; the receiving system rejects anything
//! else.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use nfse_tinus::core::*;
//! use nfse_tinus::rps;
//!
//! let issued = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 30, 0).unwrap();
//! let record = RpsBuilder::new("42", "A", issued)
//!     .special_tax_regime(SpecialTaxRegime::Estimate)
//!     .service(ServiceBuilder::new(ValuesBuilder::new("1500").build(), "01.07", "620910000", "Suporte").build())
//!     .build()
//!     .unwrap();
//! let issuer = IssuerConfig::with_cnpj("99999999000191", "1733160");
//!
//! let xml = rps::to_rps_xml(&record, Some(&issuer)).unwrap();
//! assert!(xml.contains("<ValorServicos>1500.00</ValorServicos>"));
//! assert!(xml.contains("<Prestador><Cnpj>99999999000191</Cnpj><InscricaoMunicipal>1733160</InscricaoMunicipal></Prestador>"));
//! ```

mod render;
pub(crate) mod xml_utils;

pub use render::{DocumentBuilder, to_rps_xml};
