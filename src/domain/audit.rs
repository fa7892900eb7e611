use serde::{Deserialize, Serialize};

use super::{Cents, InvalidInputError};

/// Elected offices the audit calculator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderRole {
    Mca,
    Mp,
    Governor,
    Senator,
    President,
}

impl LeaderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderRole::Mca => "mca",
            LeaderRole::Mp => "mp",
            LeaderRole::Governor => "governor",
            LeaderRole::Senator => "senator",
            LeaderRole::President => "president",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mca" => Some(LeaderRole::Mca),
            "mp" => Some(LeaderRole::Mp),
            "governor" => Some(LeaderRole::Governor),
            "senator" => Some(LeaderRole::Senator),
            "president" => Some(LeaderRole::President),
            _ => None,
        }
    }

    pub fn all() -> [LeaderRole; 5] {
        [
            LeaderRole::Mca,
            LeaderRole::Mp,
            LeaderRole::Governor,
            LeaderRole::Senator,
            LeaderRole::President,
        ]
    }
}

impl std::fmt::Display for LeaderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub role: LeaderRole,
    pub salary_cents: Cents,
    pub allowances_cents: Cents,
    pub development_cents: Cents,
    /// salary + allowances
    pub total_income_cents: Cents,
    /// total income - development spending; negative means overspend
    pub remaining_cents: Cents,
}

impl AuditReport {
    pub fn is_overspent(&self) -> bool {
        self.remaining_cents < 0
    }
}

/// Compute remaining funds for a leader: income (salary + allowances) minus
/// reported development spending. All input figures must be non-negative.
pub fn audit_leader(
    role: LeaderRole,
    salary_cents: Cents,
    allowances_cents: Cents,
    development_cents: Cents,
) -> Result<AuditReport, InvalidInputError> {
    for figure in [salary_cents, allowances_cents, development_cents] {
        if figure < 0 {
            return Err(InvalidInputError::NegativeAmount { requested: figure });
        }
    }

    let total_income_cents = salary_cents + allowances_cents;
    Ok(AuditReport {
        role,
        salary_cents,
        allowances_cents,
        development_cents,
        total_income_cents,
        remaining_cents: total_income_cents - development_cents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_remaining_funds() {
        let report = audit_leader(LeaderRole::Governor, 1_000_000, 250_000, 400_000).unwrap();

        assert_eq!(report.total_income_cents, 1_250_000);
        assert_eq!(report.remaining_cents, 850_000);
        assert!(!report.is_overspent());
    }

    #[test]
    fn test_audit_overspend_is_negative_remaining() {
        let report = audit_leader(LeaderRole::Mp, 100_000, 0, 300_000).unwrap();

        assert_eq!(report.remaining_cents, -200_000);
        assert!(report.is_overspent());
    }

    #[test]
    fn test_audit_rejects_negative_figures() {
        assert!(audit_leader(LeaderRole::Mca, -1, 0, 0).is_err());
        assert!(audit_leader(LeaderRole::Mca, 0, -1, 0).is_err());
        assert!(audit_leader(LeaderRole::Mca, 0, 0, -1).is_err());
    }

    #[test]
    fn test_role_roundtrip() {
        for role in LeaderRole::all() {
            let s = role.as_str();
            let parsed = LeaderRole::from_str(s).unwrap();
            assert_eq!(role, parsed);
        }
        assert_eq!(LeaderRole::from_str("President"), Some(LeaderRole::President));
        assert_eq!(LeaderRole::from_str("mayor"), None);
    }
}
