use chrono::NaiveDateTime;

use super::amount::Amount;
use super::codes::*;
use super::error::RpsError;
use super::types::*;
use super::validation;

/// Builder for constructing RPS records.
///
/// ```
/// use nfse_tinus::core::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let issued = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 30, 0).unwrap();
/// let rps = RpsBuilder::new("1001", "A", issued)
///     .special_tax_regime(SpecialTaxRegime::MunicipalMicroEnterprise)
///     .service(ServiceBuilder::new(
///         ValuesBuilder::new(dec!(1500)).build(),
///         "01.07",
///         "620910000",
///         "Suporte técnico em informática",
///     )
///     .build())
///     .build()
///     .unwrap();
///
/// assert_eq!(rps.identification.number, "1001");
/// ```
pub struct RpsBuilder {
    number: String,
    series: String,
    rps_type: RpsType,
    issue_date: NaiveDateTime,
    operation_nature: OperationNature,
    special_tax_regime: Option<SpecialTaxRegime>,
    simples_nacional: YesNo,
    cultural_incentive: Option<YesNo>,
    status: RpsStatus,
    service: Option<Service>,
    payer: Option<Payer>,
    intermediary: Option<Intermediary>,
    construction: Option<ConstructionSite>,
}

impl RpsBuilder {
    pub fn new(number: impl Into<String>, series: impl Into<String>, issue_date: NaiveDateTime) -> Self {
        Self {
            number: number.into(),
            series: series.into(),
            rps_type: RpsType::Rps,
            issue_date,
            operation_nature: OperationNature::TaxedInMunicipality,
            special_tax_regime: None,
            simples_nacional: YesNo::No,
            cultural_incentive: None,
            status: RpsStatus::Normal,
            service: None,
            payer: None,
            intermediary: None,
            construction: None,
        }
    }

    pub fn rps_type(mut self, rps_type: RpsType) -> Self {
        self.rps_type = rps_type;
        self
    }

    pub fn operation_nature(mut self, nature: OperationNature) -> Self {
        self.operation_nature = nature;
        self
    }

    pub fn special_tax_regime(mut self, regime: SpecialTaxRegime) -> Self {
        self.special_tax_regime = Some(regime);
        self
    }

    pub fn simples_nacional(mut self, opted_in: bool) -> Self {
        self.simples_nacional = YesNo::from(opted_in);
        self
    }

    pub fn cultural_incentive(mut self, incentive: bool) -> Self {
        self.cultural_incentive = Some(YesNo::from(incentive));
        self
    }

    pub fn status(mut self, status: RpsStatus) -> Self {
        self.status = status;
        self
    }

    pub fn service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    pub fn payer(mut self, payer: Payer) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn intermediary(mut self, intermediary: Intermediary) -> Self {
        self.intermediary = Some(intermediary);
        self
    }

    pub fn construction(mut self, work_code: impl Into<String>, art: impl Into<String>) -> Self {
        self.construction = Some(ConstructionSite {
            work_code: work_code.into(),
            art: art.into(),
        });
        self
    }

    /// Build the record and check it against the document layout.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Rps, RpsError> {
        let rps = self.build_unchecked()?;

        let errors = validation::validate_rps(&rps, None);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RpsError::Validation(msg));
        }

        Ok(rps)
    }

    /// Build without layout validation, useful for testing or importing
    /// external data.
    pub fn build_unchecked(self) -> Result<Rps, RpsError> {
        let service = self
            .service
            .ok_or_else(|| RpsError::Validation("service is required".into()))?;

        Ok(Rps {
            identification: RpsIdentification {
                number: self.number,
                series: self.series,
                rps_type: self.rps_type.code().to_string(),
            },
            issue_date: Some(self.issue_date),
            operation_nature: self.operation_nature.code().to_string(),
            special_tax_regime: self
                .special_tax_regime
                .map(|r| r.code().to_string())
                .unwrap_or_default(),
            simples_nacional: self.simples_nacional.code().to_string(),
            cultural_incentive: self.cultural_incentive.map(|c| c.code().to_string()),
            status: self.status.code().to_string(),
            service,
            payer: self.payer,
            intermediary: self.intermediary,
            construction: self.construction,
        })
    }
}

/// Builder for the `Servico` block.
pub struct ServiceBuilder {
    values: Values,
    list_item: String,
    cnae_code: Option<String>,
    municipal_tax_code: String,
    description: String,
    municipality_code: Option<String>,
}

impl ServiceBuilder {
    pub fn new(
        values: Values,
        list_item: impl Into<String>,
        municipal_tax_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            values,
            list_item: list_item.into(),
            cnae_code: None,
            municipal_tax_code: municipal_tax_code.into(),
            description: description.into(),
            municipality_code: None,
        }
    }

    pub fn cnae_code(mut self, code: impl Into<String>) -> Self {
        self.cnae_code = Some(code.into());
        self
    }

    /// Set `CodigoMunicipio`. It is only written when the values block
    /// carries a municipality code as well.
    pub fn municipality_code(mut self, code: impl Into<String>) -> Self {
        self.municipality_code = Some(code.into());
        self
    }

    pub fn build(self) -> Service {
        Service {
            values: self.values,
            list_item: self.list_item,
            cnae_code: self.cnae_code,
            municipal_tax_code: self.municipal_tax_code,
            description: self.description,
            municipality_code: self.municipality_code,
        }
    }
}

/// Builder for the `Valores` block.
pub struct ValuesBuilder {
    values: Values,
}

impl ValuesBuilder {
    pub fn new(services: impl Into<Amount>) -> Self {
        Self {
            values: Values {
                services: services.into(),
                ..Values::default()
            },
        }
    }

    pub fn deductions(mut self, amount: impl Into<Amount>) -> Self {
        self.values.deductions = Some(amount.into());
        self
    }

    pub fn pis(mut self, amount: impl Into<Amount>) -> Self {
        self.values.pis = Some(amount.into());
        self
    }

    pub fn cofins(mut self, amount: impl Into<Amount>) -> Self {
        self.values.cofins = Some(amount.into());
        self
    }

    pub fn inss(mut self, amount: impl Into<Amount>) -> Self {
        self.values.inss = Some(amount.into());
        self
    }

    pub fn ir(mut self, amount: impl Into<Amount>) -> Self {
        self.values.ir = Some(amount.into());
        self
    }

    pub fn csll(mut self, amount: impl Into<Amount>) -> Self {
        self.values.csll = Some(amount.into());
        self
    }

    pub fn iss_withheld(mut self, withheld: bool) -> Self {
        self.values.iss_withheld = Some(YesNo::from(withheld).code().to_string());
        self
    }

    pub fn iss(mut self, amount: impl Into<Amount>) -> Self {
        self.values.iss = Some(amount.into());
        self
    }

    pub fn iss_withheld_value(mut self, amount: impl Into<Amount>) -> Self {
        self.values.iss_withheld_value = Some(amount.into());
        self
    }

    pub fn other_withholdings(mut self, amount: impl Into<Amount>) -> Self {
        self.values.other_withholdings = Some(amount.into());
        self
    }

    pub fn tax_base(mut self, amount: impl Into<Amount>) -> Self {
        self.values.tax_base = Some(amount.into());
        self
    }

    pub fn rate(mut self, rate: impl Into<Amount>) -> Self {
        self.values.rate = Some(rate.into());
        self
    }

    pub fn net_value(mut self, amount: impl Into<Amount>) -> Self {
        self.values.net_value = Some(amount.into());
        self
    }

    pub fn unconditional_discount(mut self, amount: impl Into<Amount>) -> Self {
        self.values.unconditional_discount = Some(amount.into());
        self
    }

    pub fn conditional_discount(mut self, amount: impl Into<Amount>) -> Self {
        self.values.conditional_discount = Some(amount.into());
        self
    }

    /// Set the gate that makes `Servico/CodigoMunicipio` appear.
    pub fn municipality_code(mut self, code: impl Into<String>) -> Self {
        self.values.municipality_code = Some(code.into());
        self
    }

    pub fn build(self) -> Values {
        self.values
    }
}

/// Builder for the `Tomador` block.
pub struct PayerBuilder {
    payer: Payer,
}

impl PayerBuilder {
    /// Payer identified by a CNPJ.
    pub fn with_cnpj(legal_name: impl Into<String>, cnpj: impl Into<String>) -> Self {
        Self {
            payer: Payer {
                cnpj: Some(cnpj.into()),
                legal_name: legal_name.into(),
                ..Payer::default()
            },
        }
    }

    /// Payer identified by a CPF.
    pub fn with_cpf(legal_name: impl Into<String>, cpf: impl Into<String>) -> Self {
        Self {
            payer: Payer {
                cpf: Some(cpf.into()),
                legal_name: legal_name.into(),
                ..Payer::default()
            },
        }
    }

    pub fn municipal_registration(mut self, registration: impl Into<String>) -> Self {
        self.payer.municipal_registration = Some(registration.into());
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.payer.address = Some(address);
        self
    }

    pub fn build(self) -> Payer {
        self.payer
    }
}

/// Builder for the `IntermediarioServico` block.
pub struct IntermediaryBuilder {
    intermediary: Intermediary,
}

impl IntermediaryBuilder {
    pub fn with_cnpj(legal_name: impl Into<String>, cnpj: impl Into<String>) -> Self {
        Self {
            intermediary: Intermediary {
                legal_name: legal_name.into(),
                cnpj: Some(cnpj.into()),
                ..Intermediary::default()
            },
        }
    }

    pub fn with_cpf(legal_name: impl Into<String>, cpf: impl Into<String>) -> Self {
        Self {
            intermediary: Intermediary {
                legal_name: legal_name.into(),
                cpf: Some(cpf.into()),
                ..Intermediary::default()
            },
        }
    }

    pub fn municipal_registration(mut self, registration: impl Into<String>) -> Self {
        self.intermediary.municipal_registration = Some(registration.into());
        self
    }

    pub fn build(self) -> Intermediary {
        self.intermediary
    }
}

/// Builder for the payer's `Endereco`. Every field is optional.
#[derive(Default)]
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.address.street = Some(street.into());
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.address.number = Some(number.into());
        self
    }

    pub fn complement(mut self, complement: impl Into<String>) -> Self {
        self.address.complement = Some(complement.into());
        self
    }

    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.address.district = Some(district.into());
        self
    }

    pub fn municipality_code(mut self, code: impl Into<String>) -> Self {
        self.address.municipality_code = Some(code.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.address.state = Some(state.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.address.postal_code = Some(postal_code.into());
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}
