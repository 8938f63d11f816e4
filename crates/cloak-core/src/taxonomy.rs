//! The fixed set of entity labels the detector may assign.

use serde::{Deserialize, Serialize};

/// PII entity type. Labels are case-sensitive all-caps tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Address,
    IpAddress,
    Url,
    Ssn,
    PhoneNumber,
    Email,
    DriversLicense,
    PassportNumber,
    TaxpayerIdentificationNumber,
    IdNumber,
    Name,
    Username,
    Keys,
    Geolocation,
    Affiliation,
    DemographicAttribute,
    Time,
    HealthInformation,
    FinancialInformation,
    EducationalRecord,
}

impl EntityType {
    /// Every label, in prompt order.
    pub const ALL: [EntityType; 20] = [
        EntityType::Address,
        EntityType::IpAddress,
        EntityType::Url,
        EntityType::Ssn,
        EntityType::PhoneNumber,
        EntityType::Email,
        EntityType::DriversLicense,
        EntityType::PassportNumber,
        EntityType::TaxpayerIdentificationNumber,
        EntityType::IdNumber,
        EntityType::Name,
        EntityType::Username,
        EntityType::Keys,
        EntityType::Geolocation,
        EntityType::Affiliation,
        EntityType::DemographicAttribute,
        EntityType::Time,
        EntityType::HealthInformation,
        EntityType::FinancialInformation,
        EntityType::EducationalRecord,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Address => "ADDRESS",
            EntityType::IpAddress => "IP_ADDRESS",
            EntityType::Url => "URL",
            EntityType::Ssn => "SSN",
            EntityType::PhoneNumber => "PHONE_NUMBER",
            EntityType::Email => "EMAIL",
            EntityType::DriversLicense => "DRIVERS_LICENSE",
            EntityType::PassportNumber => "PASSPORT_NUMBER",
            EntityType::TaxpayerIdentificationNumber => "TAXPAYER_IDENTIFICATION_NUMBER",
            EntityType::IdNumber => "ID_NUMBER",
            EntityType::Name => "NAME",
            EntityType::Username => "USERNAME",
            EntityType::Keys => "KEYS",
            EntityType::Geolocation => "GEOLOCATION",
            EntityType::Affiliation => "AFFILIATION",
            EntityType::DemographicAttribute => "DEMOGRAPHIC_ATTRIBUTE",
            EntityType::Time => "TIME",
            EntityType::HealthInformation => "HEALTH_INFORMATION",
            EntityType::FinancialInformation => "FINANCIAL_INFORMATION",
            EntityType::EducationalRecord => "EDUCATIONAL_RECORD",
        }
    }

    /// Guidance appended to the label in the detection prompt, if any.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            EntityType::Keys => Some(
                "Passwords, passkeys, API keys, encryption keys, and any other form of security keys.",
            ),
            EntityType::Geolocation => Some(
                "Places and locations, such as cities, provinces, countries, international regions, \
                 or named infrastructures (bus stops, bridges, etc.).",
            ),
            EntityType::Affiliation => Some(
                "Names of organizations, such as public and private companies, schools, universities, \
                 public institutions, prisons, healthcare institutions, non-governmental organizations, \
                 churches, etc.",
            ),
            EntityType::DemographicAttribute => Some(
                "Demographic attributes of a person, such as native language, descent, heritage, \
                 ethnicity, nationality, religious or political group, birthmarks, ages, sexual \
                 orientation, gender and sex.",
            ),
            EntityType::Time => Some("Description of a specific date, time, or duration."),
            EntityType::HealthInformation => Some(
                "Details concerning an individual's health status, medical conditions, treatment \
                 records, and health insurance information.",
            ),
            EntityType::FinancialInformation => Some(
                "Financial details such as bank account numbers, credit card numbers, investment \
                 records, salary information, and other financial statuses or activities.",
            ),
            EntityType::EducationalRecord => Some(
                "Educational background details, including academic records, transcripts, degrees, \
                 and certification.",
            ),
            _ => None,
        }
    }

    /// Look up a label exactly as it appears in the taxonomy.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.label() == label)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
