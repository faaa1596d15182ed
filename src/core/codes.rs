//! Tinus / ABRASF code lists carried as text on the RPS record.
//!
//! The renderer never checks these; they exist so callers can fill the
//! record without memorising the numeric codes.

/// `Tipo`: kind of provisional receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpsType {
    /// 1: RPS.
    Rps,
    /// 2: Mixed invoice (nota fiscal conjugada).
    MixedInvoice,
    /// 3: Coupon.
    Coupon,
}

impl RpsType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rps => "1",
            Self::MixedInvoice => "2",
            Self::Coupon => "3",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Rps),
            "2" => Some(Self::MixedInvoice),
            "3" => Some(Self::Coupon),
            _ => None,
        }
    }
}

/// `NaturezaOperacao`: nature of the operation for ISS purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationNature {
    /// 1: Taxed in the municipality.
    TaxedInMunicipality,
    /// 2: Taxed outside the municipality.
    TaxedOutsideMunicipality,
    /// 3: Exempt.
    Exempt,
    /// 4: Immune.
    Immune,
    /// 5: Liability suspended by court decision.
    SuspendedByCourt,
    /// 6: Liability suspended by administrative procedure.
    SuspendedByAdministrativeProcedure,
}

impl OperationNature {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaxedInMunicipality => "1",
            Self::TaxedOutsideMunicipality => "2",
            Self::Exempt => "3",
            Self::Immune => "4",
            Self::SuspendedByCourt => "5",
            Self::SuspendedByAdministrativeProcedure => "6",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::TaxedInMunicipality),
            "2" => Some(Self::TaxedOutsideMunicipality),
            "3" => Some(Self::Exempt),
            "4" => Some(Self::Immune),
            "5" => Some(Self::SuspendedByCourt),
            "6" => Some(Self::SuspendedByAdministrativeProcedure),
            _ => None,
        }
    }
}

/// `RegimeEspecialTributacao`: special tax regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialTaxRegime {
    /// 1: Municipal micro-enterprise.
    MunicipalMicroEnterprise,
    /// 2: Estimate.
    Estimate,
    /// 3: Professional partnership.
    ProfessionalPartnership,
    /// 4: Cooperative.
    Cooperative,
    /// 5: Individual micro-entrepreneur (MEI).
    IndividualMicroEntrepreneur,
    /// 6: Micro or small enterprise under Simples Nacional.
    SmallEnterprise,
}

impl SpecialTaxRegime {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MunicipalMicroEnterprise => "1",
            Self::Estimate => "2",
            Self::ProfessionalPartnership => "3",
            Self::Cooperative => "4",
            Self::IndividualMicroEntrepreneur => "5",
            Self::SmallEnterprise => "6",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::MunicipalMicroEnterprise),
            "2" => Some(Self::Estimate),
            "3" => Some(Self::ProfessionalPartnership),
            "4" => Some(Self::Cooperative),
            "5" => Some(Self::IndividualMicroEntrepreneur),
            "6" => Some(Self::SmallEnterprise),
            _ => None,
        }
    }
}

/// Yes/no flag as encoded by the schema (1 = yes, 2 = no).
///
/// Used by `OptanteSimplesNacional`, `IncentivadorCultural` and `IssRetido`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Yes => "1",
            Self::No => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Yes),
            "2" => Some(Self::No),
            _ => None,
        }
    }
}

impl From<bool> for YesNo {
    fn from(b: bool) -> Self {
        if b { Self::Yes } else { Self::No }
    }
}

/// `Status` of the RPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpsStatus {
    /// 1: Normal.
    Normal,
    /// 2: Cancelled.
    Cancelled,
}

impl RpsStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Normal => "1",
            Self::Cancelled => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Normal),
            "2" => Some(Self::Cancelled),
            _ => None,
        }
    }
}
