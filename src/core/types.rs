use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::amount::{Amount, text};

/// RPS: the provisional service receipt submitted to the municipality.
///
/// Field aliases accept the flat lowercase keys of legacy JSON payloads.
/// Missing keys load as empty values; the renderer reports which mandatory
/// element is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rps {
    /// `IdentificacaoRps`.
    #[serde(alias = "identificacaorps")]
    pub identification: RpsIdentification,
    /// `DataEmissao`.
    #[serde(alias = "dataemissao")]
    pub issue_date: Option<NaiveDateTime>,
    /// `NaturezaOperacao` (see [`OperationNature`](super::OperationNature)).
    #[serde(alias = "naturezaoperacao", deserialize_with = "text::required")]
    pub operation_nature: String,
    /// `RegimeEspecialTributacao` (see [`SpecialTaxRegime`](super::SpecialTaxRegime)).
    #[serde(alias = "regimeespecialtributacao", deserialize_with = "text::required")]
    pub special_tax_regime: String,
    /// `OptanteSimplesNacional` (1 = yes, 2 = no).
    #[serde(alias = "optantesimplesnacional", deserialize_with = "text::required")]
    pub simples_nacional: String,
    /// `IncentivadorCultural` (1 = yes, 2 = no).
    #[serde(alias = "incentivadorcultural", deserialize_with = "text::optional")]
    pub cultural_incentive: Option<String>,
    /// `Status` (see [`RpsStatus`](super::RpsStatus)).
    #[serde(deserialize_with = "text::required")]
    pub status: String,
    /// `Servico`.
    #[serde(alias = "servico")]
    pub service: Service,
    /// `Tomador`: service taker.
    #[serde(alias = "tomador")]
    pub payer: Option<Payer>,
    /// `IntermediarioServico`.
    #[serde(alias = "intermediarioservico")]
    pub intermediary: Option<Intermediary>,
    /// `ConstrucaoCivil`.
    #[serde(alias = "construcaocivil")]
    pub construction: Option<ConstructionSite>,
}

/// `IdentificacaoRps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpsIdentification {
    /// `Numero`: also written as the `id` attribute of `InfRps`.
    #[serde(alias = "numero", deserialize_with = "text::required")]
    pub number: String,
    /// `Serie`.
    #[serde(alias = "serie", deserialize_with = "text::required")]
    pub series: String,
    /// `Tipo` (see [`RpsType`](super::RpsType)).
    #[serde(alias = "tipo", deserialize_with = "text::required")]
    pub rps_type: String,
}

/// `Servico`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    /// `Valores`.
    #[serde(alias = "valores")]
    pub values: Values,
    /// `ItemListaServico`: service list item (LC 116/2003).
    #[serde(alias = "itemlistaservico", deserialize_with = "text::required")]
    pub list_item: String,
    /// `CodigoCnae`: national economic activity classification.
    #[serde(alias = "codigocnae", deserialize_with = "text::optional")]
    pub cnae_code: Option<String>,
    /// `CodigoTributacaoMunicipio`.
    #[serde(alias = "codigotributacaomunicipio", deserialize_with = "text::required")]
    pub municipal_tax_code: String,
    /// `Discriminacao`: free-text description of the service.
    #[serde(alias = "discriminacao")]
    pub description: String,
    /// `CodigoMunicipio`: IBGE code of the municipality where the service
    /// was rendered. Only written when [`Values::municipality_code`] is set.
    #[serde(alias = "codigomunicipio", deserialize_with = "text::optional")]
    pub municipality_code: Option<String>,
}

/// `Valores`: monetary breakdown of the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Values {
    /// `ValorServicos`: gross service value.
    #[serde(alias = "valorservicos")]
    pub services: Amount,
    /// `ValorDeducoes`.
    #[serde(alias = "valordeducoes")]
    pub deductions: Option<Amount>,
    /// `ValorPis`.
    #[serde(alias = "valorpis")]
    pub pis: Option<Amount>,
    /// `ValorCofins`.
    #[serde(alias = "valorcofins")]
    pub cofins: Option<Amount>,
    /// `ValorInss`.
    #[serde(alias = "valorinss")]
    pub inss: Option<Amount>,
    /// `ValorIr`.
    #[serde(alias = "valorir")]
    pub ir: Option<Amount>,
    /// `ValorCsll`.
    #[serde(alias = "valorcsll")]
    pub csll: Option<Amount>,
    /// `IssRetido` (1 = yes, 2 = no).
    #[serde(alias = "issretido", deserialize_with = "text::optional")]
    pub iss_withheld: Option<String>,
    /// `ValorIss`.
    #[serde(alias = "valoriss")]
    pub iss: Option<Amount>,
    /// `ValorIssRetido`: written verbatim.
    #[serde(alias = "valorissretido")]
    pub iss_withheld_value: Option<Amount>,
    /// `OutrasRetencoes`.
    #[serde(alias = "outrasretencoes")]
    pub other_withholdings: Option<Amount>,
    /// `BaseCalculo`.
    #[serde(alias = "basecalculo")]
    pub tax_base: Option<Amount>,
    /// `Aliquota`: written with 4 decimals.
    #[serde(alias = "aliquota")]
    pub rate: Option<Amount>,
    /// `ValorLiquidoNfse`: written verbatim.
    #[serde(alias = "valorliquidonfse")]
    pub net_value: Option<Amount>,
    /// `DescontoIncondicionado`.
    #[serde(alias = "descontoincondicionado")]
    pub unconditional_discount: Option<Amount>,
    /// `DescontoCondicionado`.
    #[serde(alias = "descontocondicionado")]
    pub conditional_discount: Option<Amount>,
    /// Gate for `Servico/CodigoMunicipio`. Its presence decides whether the
    /// element is written; the value itself comes from
    /// [`Service::municipality_code`].
    #[serde(alias = "codigomunicipio", deserialize_with = "text::optional")]
    pub municipality_code: Option<String>,
}

/// A CNPJ or CPF, whichever a party carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxId<'a> {
    /// 14-digit legal entity tax ID.
    Cnpj(&'a str),
    /// 11-digit individual tax ID.
    Cpf(&'a str),
}

impl TaxId<'_> {
    /// Element name inside `CpfCnpj`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cnpj(_) => "Cnpj",
            Self::Cpf(_) => "Cpf",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Cnpj(v) | Self::Cpf(v) => v,
        }
    }
}

/// Pick the CNPJ if set, else the CPF.
fn choose_tax_id<'a>(cnpj: &'a Option<String>, cpf: &'a Option<String>) -> Option<TaxId<'a>> {
    match (cnpj, cpf) {
        (Some(cnpj), _) => Some(TaxId::Cnpj(cnpj)),
        (None, Some(cpf)) => Some(TaxId::Cpf(cpf)),
        (None, None) => None,
    }
}

/// `Tomador`: the service taker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payer {
    #[serde(deserialize_with = "text::optional")]
    pub cnpj: Option<String>,
    #[serde(deserialize_with = "text::optional")]
    pub cpf: Option<String>,
    /// `InscricaoMunicipal`: zero-padded to 7 characters on output.
    #[serde(alias = "inscricaomunicipal", deserialize_with = "text::optional")]
    pub municipal_registration: Option<String>,
    /// `RazaoSocial`.
    #[serde(alias = "razaosocial")]
    pub legal_name: String,
    /// `Endereco`.
    #[serde(alias = "endereco")]
    pub address: Option<Address>,
}

impl Payer {
    /// The tax ID written for this payer; CNPJ wins when both are set.
    pub fn tax_id(&self) -> Option<TaxId<'_>> {
        choose_tax_id(&self.cnpj, &self.cpf)
    }
}

/// `IntermediarioServico`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intermediary {
    /// `RazaoSocial`.
    #[serde(alias = "razaosocial")]
    pub legal_name: String,
    #[serde(deserialize_with = "text::optional")]
    pub cnpj: Option<String>,
    #[serde(deserialize_with = "text::optional")]
    pub cpf: Option<String>,
    /// `InscricaoMunicipal`: zero-padded to 7 characters on output.
    #[serde(alias = "inscricaomunicipal", deserialize_with = "text::optional")]
    pub municipal_registration: Option<String>,
}

impl Intermediary {
    /// The tax ID written for this intermediary; CNPJ wins when both are set.
    pub fn tax_id(&self) -> Option<TaxId<'_>> {
        choose_tax_id(&self.cnpj, &self.cpf)
    }
}

/// `Endereco` of the payer. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// `Endereco`: street.
    #[serde(alias = "endereco", deserialize_with = "text::optional")]
    pub street: Option<String>,
    /// `Numero`.
    #[serde(alias = "numero", deserialize_with = "text::optional")]
    pub number: Option<String>,
    /// `Complemento`.
    #[serde(alias = "complemento", deserialize_with = "text::optional")]
    pub complement: Option<String>,
    /// `Bairro`.
    #[serde(alias = "bairro", deserialize_with = "text::optional")]
    pub district: Option<String>,
    /// `CodigoMunicipio`: IBGE municipality code.
    #[serde(alias = "codigomunicipio", deserialize_with = "text::optional")]
    pub municipality_code: Option<String>,
    /// `Uf`: two-letter state code.
    #[serde(alias = "uf", deserialize_with = "text::optional")]
    pub state: Option<String>,
    /// `Cep`: postal code.
    #[serde(alias = "cep", deserialize_with = "text::optional")]
    pub postal_code: Option<String>,
}

/// `ConstrucaoCivil`: construction work site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionSite {
    /// `CodigoObra`.
    #[serde(alias = "codigoobra", deserialize_with = "text::required")]
    pub work_code: String,
    /// `Art`: technical-responsibility record number.
    #[serde(deserialize_with = "text::required")]
    pub art: String,
}

/// Issuer (`Prestador`) data, supplied apart from the RPS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    #[serde(deserialize_with = "text::optional")]
    pub cnpj: Option<String>,
    #[serde(deserialize_with = "text::optional")]
    pub cpf: Option<String>,
    /// `InscricaoMunicipal`: zero-padded to 7 characters on output.
    #[serde(alias = "im", deserialize_with = "text::required")]
    pub municipal_registration: String,
}

impl IssuerConfig {
    pub fn with_cnpj(cnpj: impl Into<String>, municipal_registration: impl Into<String>) -> Self {
        Self {
            cnpj: Some(cnpj.into()),
            cpf: None,
            municipal_registration: municipal_registration.into(),
        }
    }

    pub fn with_cpf(cpf: impl Into<String>, municipal_registration: impl Into<String>) -> Self {
        Self {
            cnpj: None,
            cpf: Some(cpf.into()),
            municipal_registration: municipal_registration.into(),
        }
    }
}
