//! Deterministic keyword stage.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClassifierError, Department, preprocess};

/// One department's keyword list as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentKeywords {
    pub department: Department,
    pub keywords: Vec<String>,
}

/// Keyword configuration: every department exactly once, in tie-break order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub departments: Vec<DepartmentKeywords>,
}

impl KeywordConfig {
    /// Multilingual (English, Hindi, Marathi) sets including common transcription errors.
    pub fn builtin() -> Self {
        let entry = |department, keywords: &[&str]| DepartmentKeywords {
            department,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        Self {
            departments: vec![
                entry(
                    Department::LoanServices,
                    &[
                        "loan", "mortgage", "financing", "refinance", "repayment", "credit",
                        "lone", "loaning", "loans", "mortage", "interest rate", "home loan",
                        "personal loan", "car loan", "apply for loan",
                        // hi
                        "ऋण", "ब्याज दर", "गृह ऋण", "व्यक्तिगत ऋण", "कार ऋण",
                        "ऋण के लिए आवेदन करें", "लोन",
                        // mr
                        "कर्ज", "व्याज दर", "गृह कर्ज", "वैयक्तिक कर्ज", "गाडी कर्ज",
                        "कर्जासाठी अर्ज करा",
                    ],
                ),
                entry(
                    Department::DepositAndAccountServices,
                    &[
                        "account", "deposit", "savings", "checking", "current", "balance",
                        "acct", "accnt", "dep", "deposits", "fixed deposit",
                        "recurring deposit", "tenure", "maturity amount",
                        "interest rate on deposit",
                        // hi
                        "जमा", "स्थिर जमा", "आवर्ती जमा", "अवधि", "परिपक्व राशि",
                        "जमा पर ब्याज दर", "खाता",
                        // mr
                        "ठेव", "स्थिर ठेव", "पुनरावृत्त ठेव", "मुदत", "परिपक्वता रक्कम",
                        "ठेव व्याज दर",
                    ],
                ),
                entry(
                    Department::OperationsAndServiceRequests,
                    &[
                        "password", "login", "troubleshoot", "reset", "update", "profile",
                        "passcode", "log in", "trouble shoot", "pwd reset", "cheque book",
                        "passbook", "transfer account", "account operations",
                        "branch transfer", "fund transfer", "issue passbook",
                        // hi
                        "चेक बुक", "पासबुक", "खाता स्थानांतरण", "खाता संचालन",
                        "शाखा स्थानांतरण", "धन हस्तांतरण", "पासबुक जारी करें",
                        // mr
                        "चेक पुस्तक", "खाते पुस्तिका", "खाते हस्तांतरण", "खाते कार्य",
                        "शाखा बदल", "निधी हस्तांतरण", "पासबुक देणे",
                    ],
                ),
                entry(
                    Department::CustomerGrievanceAndFraudResolution,
                    &[
                        "complaint", "grievance", "fraud", "dispute", "unauthorized",
                        "complains", "grievances", "frauds", "disputes",
                        // hi
                        "शिकायत", "धोखाधड़ी", "अनधिकृत", "विवाद",
                        // mr
                        "तक्रार", "फसवणूक", "अनधिकृत व्यवहार",
                    ],
                ),
            ],
        }
    }

    /// Reads and validates a JSON keyword file.
    pub fn from_json_file(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ClassifierError::KeywordFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|e| ClassifierError::KeywordFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        for department in Department::ALL {
            let occurrences = self
                .departments
                .iter()
                .filter(|entry| entry.department == department)
                .count();
            if occurrences != 1 {
                return Err(ClassifierError::InvalidKeywords {
                    reason: format!(
                        "{} must appear exactly once, found {}",
                        department, occurrences
                    ),
                });
            }
        }

        for entry in &self.departments {
            if entry.keywords.iter().all(|k| preprocess(k).is_empty()) {
                return Err(ClassifierError::InvalidKeywords {
                    reason: format!("{} has no usable keywords", entry.department),
                });
            }
        }

        Ok(())
    }
}

/// Per-department keyword hit counts, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordScores {
    counts: Vec<(Department, usize)>,
}

impl KeywordScores {
    pub fn counts(&self) -> &[(Department, usize)] {
        &self.counts
    }

    pub fn count_for(&self, department: Department) -> usize {
        self.counts
            .iter()
            .find(|(d, _)| *d == department)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Department with the highest count; ties go to the earliest registered.
    ///
    /// `None` when nothing matched.
    pub fn best(&self) -> Option<(Department, usize)> {
        let mut best: Option<(Department, usize)> = None;
        for &(department, count) in &self.counts {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((department, count)),
            }
        }
        best
    }
}

/// Validated, normalised keyword table.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<(Department, Vec<String>)>,
}

impl KeywordTable {
    /// Normalises keywords with the query preprocessing and drops duplicates.
    pub fn new(config: &KeywordConfig) -> Result<Self, ClassifierError> {
        config.validate()?;

        let entries = config
            .departments
            .iter()
            .map(|entry| {
                let mut keywords: Vec<String> = Vec::with_capacity(entry.keywords.len());
                for keyword in entry.keywords.iter().map(|k| preprocess(k)) {
                    if !keyword.is_empty() && !keywords.contains(&keyword) {
                        keywords.push(keyword);
                    }
                }
                (entry.department, keywords)
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        Self::new(&KeywordConfig::builtin()).expect("built-in keyword config is valid")
    }

    /// Departments in tie-break order.
    pub fn departments(&self) -> impl Iterator<Item = Department> + '_ {
        self.entries.iter().map(|(d, _)| *d)
    }

    pub fn keywords_for(&self, department: Department) -> &[String] {
        self.entries
            .iter()
            .find(|(d, _)| *d == department)
            .map(|(_, k)| k.as_slice())
            .unwrap_or(&[])
    }

    /// Counts non-overlapping substring occurrences of every keyword.
    ///
    /// Matching is substring-based, so a keyword inside a longer word counts too
    /// (`"dep"` in `"department"`).
    pub fn score(&self, normalized: &str) -> KeywordScores {
        let counts = self
            .entries
            .iter()
            .map(|(department, keywords)| {
                let hits = keywords
                    .iter()
                    .map(|keyword| normalized.matches(keyword.as_str()).count())
                    .sum();
                (*department, hits)
            })
            .collect();

        KeywordScores { counts }
    }
}
