//! # nfse-tinus
//!
//! Builds the RPS (Recibo Provisório de Serviços) XML documents submitted to
//! municipal NFS-e web services of the Tinus standard.
//!
//! Records are plain typed values; the XML layout (element order, optional
//! elements, 2- and 4-decimal amounts, zero-padded municipal registrations)
//! is applied at render time. Rendering is a pure function of its inputs.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use nfse_tinus::core::*;
//! use nfse_tinus::rps;
//! use rust_decimal_macros::dec;
//!
//! let issued = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let record = RpsBuilder::new("1001", "A", issued)
//!     .special_tax_regime(SpecialTaxRegime::MunicipalMicroEnterprise)
//!     .service(ServiceBuilder::new(
//!         ValuesBuilder::new(dec!(1234.5)).rate(dec!(0.05)).build(),
//!         "01.07",
//!         "620910000",
//!         "Desenvolvimento de software",
//!     )
//!     .build())
//!     .payer(PayerBuilder::with_cpf("Maria Silva", "12345678909").build())
//!     .build()
//!     .unwrap();
//!
//! let xml = rps::to_rps_xml(&record, None).unwrap();
//! assert!(xml.contains("<ValorServicos>1234.50</ValorServicos>"));
//! assert!(xml.contains("<Aliquota>0.0500</Aliquota>"));
//! assert!(xml.contains("<CpfCnpj><Cpf>12345678909</Cpf></CpfCnpj>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | RPS types, code lists, formatting, layout validation |
//! | `rps` (default) | XML rendering |
//! | `json` | Loading records and issuer config from JSON |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "rps")]
pub mod rps;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
