//! Counterparties of ledger entries and their relation taxonomies.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
/// Selects which relation enumeration applies to a legal person.
pub enum LegalPersonType {
    /// No value given.
    #[default]
    None,
    Company,
    Organization,
    Person,
}

impl LegalPersonType {
    pub fn parse(value: &str) -> Option<LegalPersonType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(LegalPersonType::None),
            "company" => Some(LegalPersonType::Company),
            "organization" | "organisation" => Some(LegalPersonType::Organization),
            "person" => Some(LegalPersonType::Person),
            _ => None,
        }
    }
}

impl fmt::Display for LegalPersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LegalPersonType::None => "None",
            LegalPersonType::Company => "Company",
            LegalPersonType::Organization => "Organization",
            LegalPersonType::Person => "Person",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// How the user relates to a company.
pub enum CompanyRelation {
    Employee,
    /// External worker placed in this company.
    ExternalWorker,
    Customer,
    Supplier,
    Ceo,
    /// Incomes and expenses are dividends.
    Shareholder,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// How the user relates to another person.
pub enum PersonRelation {
    Family,
    Friend,
    /// Youtuber, streamer, influencer and the like.
    PublicFigure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// How the user relates to an organization.
pub enum OrganizationRelation {
    Member,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
/// Relation value tagged with the legal person kind that owns its enumeration.
pub enum Relation {
    Company(CompanyRelation),
    Person(PersonRelation),
    Organization(OrganizationRelation),
}

impl Relation {
    /// The legal person kind this relation belongs to.
    pub fn kind(&self) -> LegalPersonType {
        match self {
            Relation::Company(_) => LegalPersonType::Company,
            Relation::Person(_) => LegalPersonType::Person,
            Relation::Organization(_) => LegalPersonType::Organization,
        }
    }

    /// Parses a relation name for the given kind, e.g. `("company", "ceo")`.
    pub fn parse(kind: LegalPersonType, value: &str) -> Option<Relation> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match kind {
            LegalPersonType::None => None,
            LegalPersonType::Company => {
                let relation = match normalized.as_str() {
                    "employee" => CompanyRelation::Employee,
                    "externalworker" => CompanyRelation::ExternalWorker,
                    "customer" => CompanyRelation::Customer,
                    "supplier" => CompanyRelation::Supplier,
                    "ceo" => CompanyRelation::Ceo,
                    "shareholder" => CompanyRelation::Shareholder,
                    _ => return None,
                };
                Some(Relation::Company(relation))
            }
            LegalPersonType::Person => {
                let relation = match normalized.as_str() {
                    "family" => PersonRelation::Family,
                    "friend" => PersonRelation::Friend,
                    "publicfigure" => PersonRelation::PublicFigure,
                    _ => return None,
                };
                Some(Relation::Person(relation))
            }
            LegalPersonType::Organization => match normalized.as_str() {
                "member" => Some(Relation::Organization(OrganizationRelation::Member)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Relation::Company(CompanyRelation::Employee) => "Employee",
            Relation::Company(CompanyRelation::ExternalWorker) => "External Worker",
            Relation::Company(CompanyRelation::Customer) => "Customer",
            Relation::Company(CompanyRelation::Supplier) => "Supplier",
            Relation::Company(CompanyRelation::Ceo) => "CEO",
            Relation::Company(CompanyRelation::Shareholder) => "Shareholder",
            Relation::Person(PersonRelation::Family) => "Family",
            Relation::Person(PersonRelation::Friend) => "Friend",
            Relation::Person(PersonRelation::PublicFigure) => "Public Figure",
            Relation::Organization(OrganizationRelation::Member) => "Member",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reasons a [`LegalPerson`] cannot be constructed.
pub enum LegalPersonError {
    EmptyName,
    MissingRelation(LegalPersonType),
    UnexpectedRelation(Relation),
    RelationMismatch {
        kind: LegalPersonType,
        relation: Relation,
    },
}

impl fmt::Display for LegalPersonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegalPersonError::EmptyName => f.write_str("legal person name must not be empty"),
            LegalPersonError::MissingRelation(kind) => {
                write!(f, "a {kind} legal person requires a relation")
            }
            LegalPersonError::UnexpectedRelation(relation) => {
                write!(f, "relation `{relation}` given for a legal person without a type")
            }
            LegalPersonError::RelationMismatch { kind, relation } => write!(
                f,
                "relation `{relation}` belongs to {} but the legal person is a {kind}",
                relation.kind()
            ),
        }
    }
}

impl std::error::Error for LegalPersonError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A counterparty referenced by one or more finances.
pub struct LegalPerson {
    pub id: Uuid,
    name: String,
    #[serde(default)]
    kind: LegalPersonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relation: Option<Relation>,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    notes: String,
}

impl LegalPerson {
    pub fn new(
        name: impl Into<String>,
        kind: LegalPersonType,
        relation: Option<Relation>,
        phone: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<Self, LegalPersonError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LegalPersonError::EmptyName);
        }
        check_relation(kind, relation)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            kind,
            relation,
            phone: phone.into(),
            notes: notes.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LegalPersonType {
        self.kind
    }

    pub fn relation(&self) -> Option<Relation> {
        self.relation
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Re-checks the construction rules, for records that arrived through deserialization.
    pub fn validate(&self) -> Result<(), LegalPersonError> {
        if self.name.trim().is_empty() {
            return Err(LegalPersonError::EmptyName);
        }
        check_relation(self.kind, self.relation)
    }

    /// Structural comparison on name, phone and notes. The relation is not compared.
    pub fn is_similar_to(&self, other: &LegalPerson) -> bool {
        self.name == other.name && self.phone == other.phone && self.notes == other.notes
    }
}

fn check_relation(
    kind: LegalPersonType,
    relation: Option<Relation>,
) -> Result<(), LegalPersonError> {
    match (kind, relation) {
        (LegalPersonType::None, None) => Ok(()),
        (LegalPersonType::None, Some(relation)) => {
            Err(LegalPersonError::UnexpectedRelation(relation))
        }
        (kind, None) => Err(LegalPersonError::MissingRelation(kind)),
        (kind, Some(relation)) if relation.kind() != kind => {
            Err(LegalPersonError::RelationMismatch { kind, relation })
        }
        _ => Ok(()),
    }
}

impl PartialEq for LegalPerson {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LegalPerson {}

impl Displayable for LegalPerson {
    fn display_label(&self) -> String {
        match self.relation {
            Some(relation) => format!("{} ({}, {})", self.name, self.kind, relation),
            None => self.name.clone(),
        }
    }
}
