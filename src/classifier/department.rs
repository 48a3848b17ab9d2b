use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ClassifierError;

/// Back-office team a customer query is routed to.
///
/// Serialises as the human-readable department name. Parsing also accepts the variant
/// identifier and the short codes used by the ticketing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Loan Services Department", alias = "LoanServices", alias = "loan")]
    LoanServices,

    #[serde(
        rename = "Deposit & Account Services Department",
        alias = "DepositAndAccountServices",
        alias = "deposit"
    )]
    DepositAndAccountServices,

    #[serde(
        rename = "Operations & Service Requests Department",
        alias = "OperationsAndServiceRequests",
        alias = "operation"
    )]
    OperationsAndServiceRequests,

    #[serde(
        rename = "Customer Grievance & Fraud Resolution Department",
        alias = "CustomerGrievanceAndFraudResolution",
        alias = "grievance"
    )]
    CustomerGrievanceAndFraudResolution,
}

impl Department {
    /// Registration order. Keyword ties resolve to the earliest entry.
    pub const ALL: [Department; 4] = [
        Department::LoanServices,
        Department::DepositAndAccountServices,
        Department::OperationsAndServiceRequests,
        Department::CustomerGrievanceAndFraudResolution,
    ];

    /// Default destination when classification degrades.
    pub const FALLBACK: Department = Department::LoanServices;

    pub fn name(&self) -> &'static str {
        match self {
            Department::LoanServices => "Loan Services Department",
            Department::DepositAndAccountServices => "Deposit & Account Services Department",
            Department::OperationsAndServiceRequests => {
                "Operations & Service Requests Department"
            }
            Department::CustomerGrievanceAndFraudResolution => {
                "Customer Grievance & Fraud Resolution Department"
            }
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Department::LoanServices => "LoanServices",
            Department::DepositAndAccountServices => "DepositAndAccountServices",
            Department::OperationsAndServiceRequests => "OperationsAndServiceRequests",
            Department::CustomerGrievanceAndFraudResolution => {
                "CustomerGrievanceAndFraudResolution"
            }
        }
    }

    /// Ticketing-service short code.
    pub fn code(&self) -> &'static str {
        match self {
            Department::LoanServices => "loan",
            Department::DepositAndAccountServices => "deposit",
            Department::OperationsAndServiceRequests => "operation",
            Department::CustomerGrievanceAndFraudResolution => "grievance",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Department {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| {
                s == d.name()
                    || s.eq_ignore_ascii_case(d.identifier())
                    || s.eq_ignore_ascii_case(d.code())
            })
            .ok_or_else(|| ClassifierError::UnknownDepartment {
                value: s.to_string(),
            })
    }
}
