use serde::{Deserialize, Serialize};

/// The audience segment a calculation is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Individual,
    #[serde(rename = "sole-prop")]
    SoleProprietorship,
    Company,
}

impl EntityType {
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Individual,
            EntityType::SoleProprietorship,
            EntityType::Company,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::SoleProprietorship => "sole-prop",
            Self::Company => "company",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::SoleProprietorship => "Sole Proprietorship",
            Self::Company => "Company",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_codes_match_serialized_names() {
        for entity in EntityType::all() {
            let json = serde_json::to_string(entity).unwrap();

            assert_eq!(json, format!("\"{}\"", entity.as_str()));
        }
    }
}
