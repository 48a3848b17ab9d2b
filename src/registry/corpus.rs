//! Fixed, versioned training corpus for the statistical stage.

use crate::classifier::Department;
use crate::hashing::corpus_fingerprint;

/// Bump whenever the built-in samples change; cached bundles from older corpora retrain.
pub const CORPUS_VERSION: u32 = 1;

const LOAN_SAMPLES: &[&str] = &[
    "What is the interest rate on home loans?",
    "I need a car loan. What are the eligibility criteria?",
    "How can I apply for a personal loan?",
    "Tell me about car loan tenure",
    "Can I prepay my housing finance early without penalty?",
    "What documents are needed for an education loan?",
    "गृह ऋण पर ब्याज दर क्या है?",
    "मैं व्यक्तिगत ऋण के लिए आवेदन कैसे करूं?",
    "कार ऋण की अवधि क्या है?",
    "गृह कर्ज व्याज दर किती आहे?",
    "मी वैयक्तिक कर्जासाठी अर्ज कसा करू?",
    "गाडी कर्जाचा कालावधी किती आहे?",
];

const DEPOSIT_SAMPLES: &[&str] = &[
    "What is the tenure of a fixed deposit?",
    "What will be the maturity amount of my RD?",
    "What is the interest rate on deposits?",
    "I want to open a new savings account",
    "When does my term deposit reach maturity?",
    "How do I check the balance in my account?",
    "नियत जमा की अवधि क्या है?",
    "मेरे आवर्ती जमा की परिपक्व राशि कितनी होगी?",
    "जमा पर ब्याज दर क्या है?",
    "स्थिर ठेवीची मुदत किती आहे?",
    "माझ्या पुनरावृत्ती ठेविची परिपक्व रक्कम किती असेल?",
    "ठेवींवर व्याज दर काय आहे?",
];

const OPERATIONS_SAMPLES: &[&str] = &[
    "How to get a new cheque book issued?",
    "I need to transfer my account to another branch",
    "How do I get a passbook issued?",
    "I forgot my net banking password",
    "Please update the mobile number linked to my profile",
    "How can I change my registered address?",
    "मुझे नई चेक बुक कैसे मिलेगी?",
    "मुझे अपनी शाखा स्थानांतरित करनी है",
    "पासबुक जारी करने की प्रक्रिया क्या है?",
    "मला नवीन चेक बुक कसे मिळेल?",
    "माझे खाते दुसऱ्या शाखेत हस्तांतरित करायचे आहे",
    "पासबुक जारी करण्याची प्रक्रिया काय आहे?",
];

const GRIEVANCE_SAMPLES: &[&str] = &[
    "I suspect fraudulent transactions in my account.",
    "Someone withdrew money from my card without my permission",
    "I want to file a complaint about the branch staff",
    "My money was debited twice and nobody is helping",
    "I received a phishing call pretending to be the bank",
    "The ATM did not dispense cash but my account was charged",
    "मेरे खाते से बिना अनुमति के पैसे निकाले गए",
    "मुझे शाखा कर्मचारियों के खिलाफ शिकायत दर्ज करनी है",
    "मेरे कार्ड से धोखाधड़ी का लेनदेन हुआ है",
    "माझ्या खात्यातून परवानगीशिवाय पैसे काढले गेले",
    "मला शाखेतील कर्मचाऱ्यांविरुद्ध तक्रार करायची आहे",
    "माझ्या कार्डवर फसवणुकीचा व्यवहार झाला आहे",
];

/// Labelled samples plus a version marker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCorpus {
    version: u32,
    samples: Vec<(String, Department)>,
}

impl TrainingCorpus {
    pub fn new(version: u32, samples: Vec<(String, Department)>) -> Self {
        Self { version, samples }
    }

    /// English, Hindi and Marathi samples for every department.
    pub fn builtin() -> Self {
        let groups = [
            (Department::LoanServices, LOAN_SAMPLES),
            (Department::DepositAndAccountServices, DEPOSIT_SAMPLES),
            (Department::OperationsAndServiceRequests, OPERATIONS_SAMPLES),
            (
                Department::CustomerGrievanceAndFraudResolution,
                GRIEVANCE_SAMPLES,
            ),
        ];

        let samples = groups
            .into_iter()
            .flat_map(|(department, texts)| {
                texts.iter().map(move |text| (text.to_string(), department))
            })
            .collect();

        Self::new(CORPUS_VERSION, samples)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn samples(&self) -> &[(String, Department)] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// BLAKE3 over every `(text, label)` pair, in order.
    pub fn fingerprint(&self) -> [u8; 32] {
        corpus_fingerprint(
            self.samples
                .iter()
                .map(|(text, department)| (text.as_str(), department.name())),
        )
    }
}
