//! Ordered element tables for the Tinus RPS layout.
//!
//! The receiving system rejects documents whose elements are out of order,
//! so every block is an ordered slice of [`Field`] descriptors and [`walk`]
//! visits them in document order. The XML renderer and the collecting
//! validator are both [`DocumentSink`]s fed by the same walk.

use std::borrow::Cow;

use chrono::NaiveDateTime;

use super::amount::{Amount, format_amount, format_rate, pad_registration};
use super::error::RpsError;
use super::types::*;

/// `DataEmissao` layout.
pub const ISSUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// When a leaf element must be written.
pub(crate) enum Presence<T> {
    /// Always written; missing or empty is a schema violation.
    Required,
    /// Written only when non-empty.
    Optional,
    /// Absent is fine, but a value that is set must not be empty.
    NonEmptyIfSet,
    /// Required when the predicate holds, omitted otherwise.
    RequiredWhen(fn(&T) -> bool),
}

/// How a leaf value is turned into element text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Written as given (trimmed).
    Text,
    /// Decimal with exactly 2 places.
    Amount,
    /// Decimal with exactly 4 places.
    Rate,
    /// Zero-padded to 7 characters.
    Registration,
}

/// One leaf element of a block.
pub(crate) struct Field<T> {
    pub tag: &'static str,
    pub presence: Presence<T>,
    pub format: Format,
    pub value: fn(&T) -> Option<Cow<'_, str>>,
}

impl<T> Field<T> {
    /// Resolve the element text for `record`, or `None` when the element
    /// is to be left out.
    pub(crate) fn resolve(&self, record: &T, parent: &str) -> Result<Option<String>, RpsError> {
        let raw = (self.value)(record);
        let is_set = raw.is_some();
        let text = raw.as_deref().map(str::trim).filter(|t| !t.is_empty());

        let mandatory = match &self.presence {
            Presence::Required => true,
            Presence::Optional => false,
            Presence::NonEmptyIfSet => is_set,
            Presence::RequiredWhen(when) => {
                if !when(record) {
                    return Ok(None);
                }
                true
            }
        };

        let Some(text) = text else {
            return if mandatory {
                Err(RpsError::missing(format!("{parent}/{}", self.tag)))
            } else {
                Ok(None)
            };
        };

        let formatted = match self.format {
            Format::Text => Some(text.to_string()),
            Format::Amount => format_amount(text),
            Format::Rate => format_rate(text),
            Format::Registration => Some(pad_registration(text)),
        };
        formatted
            .map(Some)
            .ok_or_else(|| RpsError::Formatting {
                path: format!("{parent}/{}", self.tag),
                value: text.to_string(),
            })
    }
}

/// Receiver of the document walk.
pub(crate) trait DocumentSink {
    fn start(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> Result<(), RpsError>;
    fn end(&mut self, tag: &'static str) -> Result<(), RpsError>;
    /// An element without children.
    fn empty(&mut self, tag: &'static str) -> Result<(), RpsError>;
    fn leaf(&mut self, tag: &'static str, text: &str) -> Result<(), RpsError>;
    /// Called for every violation found; returning `Err` stops the walk.
    fn violation(&mut self, err: RpsError) -> Result<(), RpsError>;
}

fn text(s: &str) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(s))
}

fn opt(s: &Option<String>) -> Option<Cow<'_, str>> {
    s.as_deref().map(Cow::Borrowed)
}

fn amount(a: &Option<Amount>) -> Option<Cow<'_, str>> {
    a.as_ref().map(|a| Cow::Borrowed(a.as_str()))
}

fn date(d: &Option<NaiveDateTime>) -> Option<Cow<'static, str>> {
    d.map(|d| Cow::Owned(d.format(ISSUE_DATE_FORMAT).to_string()))
}

macro_rules! field {
    ($presence:ident, $format:ident, $tag:literal, $value:expr) => {
        Field {
            tag: $tag,
            presence: Presence::$presence,
            format: Format::$format,
            value: $value,
        }
    };
}

pub(crate) const IDENTIFICATION: &[Field<RpsIdentification>] = &[
    field!(Required, Text, "Numero", |id| text(&id.number)),
    field!(Required, Text, "Serie", |id| text(&id.series)),
    field!(Required, Text, "Tipo", |id| text(&id.rps_type)),
];

pub(crate) const HEADER: &[Field<Rps>] = &[
    field!(Required, Text, "DataEmissao", |r| date(&r.issue_date)),
    field!(Required, Text, "NaturezaOperacao", |r| text(&r.operation_nature)),
    field!(Required, Text, "RegimeEspecialTributacao", |r| text(&r.special_tax_regime)),
    field!(Required, Text, "OptanteSimplesNacional", |r| text(&r.simples_nacional)),
    field!(Optional, Text, "IncentivadorCultural", |r| opt(&r.cultural_incentive)),
    field!(Required, Text, "Status", |r| text(&r.status)),
];

pub(crate) const VALUES: &[Field<Values>] = &[
    Field {
        tag: "ValorServicos",
        presence: Presence::Required,
        format: Format::Amount,
        value: |v| text(v.services.as_str()),
    },
    field!(Optional, Amount, "ValorDeducoes", |v| amount(&v.deductions)),
    field!(Optional, Amount, "ValorPis", |v| amount(&v.pis)),
    field!(Optional, Amount, "ValorCofins", |v| amount(&v.cofins)),
    field!(Optional, Amount, "ValorInss", |v| amount(&v.inss)),
    field!(Optional, Amount, "ValorIr", |v| amount(&v.ir)),
    field!(Optional, Amount, "ValorCsll", |v| amount(&v.csll)),
    field!(Optional, Text, "IssRetido", |v| opt(&v.iss_withheld)),
    field!(Optional, Amount, "ValorIss", |v| amount(&v.iss)),
    field!(Optional, Text, "ValorIssRetido", |v| amount(&v.iss_withheld_value)),
    field!(Optional, Amount, "OutrasRetencoes", |v| amount(&v.other_withholdings)),
    field!(Optional, Amount, "BaseCalculo", |v| amount(&v.tax_base)),
    Field {
        tag: "Aliquota",
        presence: Presence::Optional,
        format: Format::Rate,
        value: |v| amount(&v.rate),
    },
    Field {
        tag: "ValorLiquidoNfse",
        presence: Presence::NonEmptyIfSet,
        format: Format::Text,
        value: |v| amount(&v.net_value),
    },
    field!(Optional, Amount, "DescontoIncondicionado", |v| amount(&v.unconditional_discount)),
    field!(Optional, Amount, "DescontoCondicionado", |v| amount(&v.conditional_discount)),
];

pub(crate) const SERVICE: &[Field<Service>] = &[
    field!(Required, Text, "ItemListaServico", |s| text(&s.list_item)),
    field!(Optional, Text, "CodigoCnae", |s| opt(&s.cnae_code)),
    field!(Required, Text, "CodigoTributacaoMunicipio", |s| text(&s.municipal_tax_code)),
    field!(Required, Text, "Discriminacao", |s| text(&s.description)),
    // Gated on the Valores record, value taken from Servico.
    Field {
        tag: "CodigoMunicipio",
        presence: Presence::RequiredWhen(|s| s.values.municipality_code.is_some()),
        format: Format::Text,
        value: |s| opt(&s.municipality_code),
    },
];

pub(crate) const ISSUER: &[Field<IssuerConfig>] = &[
    field!(Optional, Text, "Cnpj", |c| opt(&c.cnpj)),
    field!(Optional, Text, "Cpf", |c| opt(&c.cpf)),
    Field {
        tag: "InscricaoMunicipal",
        presence: Presence::Required,
        format: Format::Registration,
        value: |c| text(&c.municipal_registration),
    },
];

pub(crate) const PAYER_TAX_ID: &[Field<Payer>] = &[
    Field {
        tag: "Cnpj",
        presence: Presence::RequiredWhen(|p| matches!(p.tax_id(), Some(TaxId::Cnpj(_)))),
        format: Format::Text,
        value: |p| opt(&p.cnpj),
    },
    Field {
        tag: "Cpf",
        presence: Presence::RequiredWhen(|p| !matches!(p.tax_id(), Some(TaxId::Cnpj(_)))),
        format: Format::Text,
        value: |p| opt(&p.cpf),
    },
];

pub(crate) const PAYER_REGISTRATION: &[Field<Payer>] = &[Field {
    tag: "InscricaoMunicipal",
    presence: Presence::Optional,
    format: Format::Registration,
    value: |p| opt(&p.municipal_registration),
}];

pub(crate) const PAYER_NAME: &[Field<Payer>] =
    &[field!(Required, Text, "RazaoSocial", |p| text(&p.legal_name))];

pub(crate) const ADDRESS: &[Field<Address>] = &[
    field!(Optional, Text, "Endereco", |a| opt(&a.street)),
    field!(Optional, Text, "Numero", |a| opt(&a.number)),
    field!(Optional, Text, "Complemento", |a| opt(&a.complement)),
    field!(Optional, Text, "Bairro", |a| opt(&a.district)),
    field!(Optional, Text, "CodigoMunicipio", |a| opt(&a.municipality_code)),
    field!(Optional, Text, "Uf", |a| opt(&a.state)),
    field!(Optional, Text, "Cep", |a| opt(&a.postal_code)),
];

pub(crate) const INTERMEDIARY_NAME: &[Field<Intermediary>] =
    &[field!(Required, Text, "RazaoSocial", |i| text(&i.legal_name))];

pub(crate) const INTERMEDIARY_TAX_ID: &[Field<Intermediary>] = &[
    Field {
        tag: "Cnpj",
        presence: Presence::RequiredWhen(|i| matches!(i.tax_id(), Some(TaxId::Cnpj(_)))),
        format: Format::Text,
        value: |i| opt(&i.cnpj),
    },
    Field {
        tag: "Cpf",
        presence: Presence::RequiredWhen(|i| !matches!(i.tax_id(), Some(TaxId::Cnpj(_)))),
        format: Format::Text,
        value: |i| opt(&i.cpf),
    },
];

pub(crate) const INTERMEDIARY_REGISTRATION: &[Field<Intermediary>] = &[Field {
    tag: "InscricaoMunicipal",
    presence: Presence::Optional,
    format: Format::Registration,
    value: |i| opt(&i.municipal_registration),
}];

pub(crate) const CONSTRUCTION: &[Field<ConstructionSite>] = &[
    field!(Required, Text, "CodigoObra", |c| text(&c.work_code)),
    field!(Required, Text, "Art", |c| text(&c.art)),
];

/// Emit the leaves of `fields` directly into the currently open element.
fn leaves<T>(
    sink: &mut impl DocumentSink,
    fields: &[Field<T>],
    record: &T,
    path: &str,
) -> Result<(), RpsError> {
    for field in fields {
        match field.resolve(record, path) {
            Ok(Some(value)) => sink.leaf(field.tag, &value)?,
            Ok(None) => {}
            Err(err) => sink.violation(err)?,
        }
    }
    Ok(())
}

/// Emit a leaf-only element `tag` holding `fields`. Written self-closing
/// when every leaf is left out.
fn block<T>(
    sink: &mut impl DocumentSink,
    tag: &'static str,
    fields: &[Field<T>],
    record: &T,
    parent: &str,
) -> Result<(), RpsError> {
    let path = format!("{parent}/{tag}");
    let mut resolved = Vec::with_capacity(fields.len());
    for field in fields {
        match field.resolve(record, &path) {
            Ok(Some(value)) => resolved.push((field.tag, value)),
            Ok(None) => {}
            Err(err) => sink.violation(err)?,
        }
    }
    if resolved.is_empty() {
        return sink.empty(tag);
    }
    sink.start(tag, &[])?;
    for (leaf_tag, value) in resolved {
        sink.leaf(leaf_tag, &value)?;
    }
    sink.end(tag)
}

/// Walk `rps` in document order, feeding `sink`.
pub(crate) fn walk(
    rps: &Rps,
    issuer: Option<&IssuerConfig>,
    sink: &mut impl DocumentSink,
) -> Result<(), RpsError> {
    const INF: &str = "InfRps";

    sink.start("Rps", &[])?;
    // Same text as the trimmed `Numero` leaf.
    sink.start(INF, &[("id", rps.identification.number.trim())])?;

    block(sink, "IdentificacaoRps", IDENTIFICATION, &rps.identification, INF)?;
    leaves(sink, HEADER, rps, INF)?;

    service(sink, &rps.service, INF)?;
    if let Some(config) = issuer {
        block(sink, "Prestador", ISSUER, config, INF)?;
    }
    if let Some(payer) = &rps.payer {
        self::payer(sink, payer, INF)?;
    }
    if let Some(intermediary) = &rps.intermediary {
        self::intermediary(sink, intermediary, INF)?;
    }
    if let Some(site) = &rps.construction {
        block(sink, "ConstrucaoCivil", CONSTRUCTION, site, INF)?;
    }

    sink.end(INF)?;
    sink.end("Rps")
}

fn service(sink: &mut impl DocumentSink, service: &Service, parent: &str) -> Result<(), RpsError> {
    let path = format!("{parent}/Servico");
    sink.start("Servico", &[])?;
    block(sink, "Valores", VALUES, &service.values, &path)?;
    leaves(sink, SERVICE, service, &path)?;
    sink.end("Servico")
}

fn payer(sink: &mut impl DocumentSink, payer: &Payer, parent: &str) -> Result<(), RpsError> {
    let path = format!("{parent}/Tomador");
    let ident = format!("{path}/IdentificacaoTomador");

    sink.start("Tomador", &[])?;
    sink.start("IdentificacaoTomador", &[])?;
    block(sink, "CpfCnpj", PAYER_TAX_ID, payer, &ident)?;
    leaves(sink, PAYER_REGISTRATION, payer, &ident)?;
    sink.end("IdentificacaoTomador")?;
    leaves(sink, PAYER_NAME, payer, &path)?;

    // Endereco is written for every payer, empty if need be.
    let none = Address::default();
    let address = payer.address.as_ref().unwrap_or(&none);
    block(sink, "Endereco", ADDRESS, address, &path)?;

    sink.end("Tomador")
}

fn intermediary(
    sink: &mut impl DocumentSink,
    intermediary: &Intermediary,
    parent: &str,
) -> Result<(), RpsError> {
    let path = format!("{parent}/IntermediarioServico");
    sink.start("IntermediarioServico", &[])?;
    leaves(sink, INTERMEDIARY_NAME, intermediary, &path)?;
    block(sink, "CpfCnpj", INTERMEDIARY_TAX_ID, intermediary, &path)?;
    leaves(sink, INTERMEDIARY_REGISTRATION, intermediary, &path)?;
    sink.end("IntermediarioServico")
}
