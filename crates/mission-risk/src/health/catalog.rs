use serde::{Deserialize, Serialize};

/// Severity tier for a health condition or an aggregate health assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthRiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl HealthRiskTier {
    /// Tier for an aggregate risk value.
    pub fn from_risk(risk: f64) -> Self {
        if risk >= 0.7 {
            Self::Critical
        } else if risk >= 0.5 {
            Self::High
        } else if risk >= 0.3 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            HealthRiskTier::Low => "LOW",
            HealthRiskTier::Moderate => "MODERATE",
            HealthRiskTier::High => "HIGH",
            HealthRiskTier::Critical => "CRITICAL",
        }
    }
}

/// Catalog entry for a known condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCondition {
    pub key: String,
    pub name: String,
    pub description: String,
    pub tier: HealthRiskTier,
    /// Contribution to the aggregate risk, in [0, 1].
    pub base_risk: f64,
    pub blocks_mission: bool,
    pub remediation: String,
    pub symptoms: Vec<String>,
    pub category: String,
}

impl HealthCondition {
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
            || self
                .symptoms
                .iter()
                .any(|symptom| symptom.to_lowercase().contains(&term))
    }
}

/// Condition summary suitable for intake form pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionFormEntry {
    pub key: String,
    pub name: String,
    pub description: String,
    pub tier: HealthRiskTier,
    pub category: String,
}

/// Tiered taxonomy of health conditions, loaded once at startup.
#[derive(Debug, Clone)]
pub struct HealthCatalog {
    conditions: Vec<HealthCondition>,
}

impl HealthCatalog {
    pub fn new(conditions: Vec<HealthCondition>) -> Self {
        Self { conditions }
    }

    pub fn standard() -> Self {
        Self::new(standard_conditions())
    }

    pub fn conditions(&self) -> &[HealthCondition] {
        &self.conditions
    }

    pub fn lookup(&self, key: &str) -> Option<&HealthCondition> {
        self.conditions.iter().find(|condition| condition.key == key)
    }

    pub fn by_tier(&self, tier: HealthRiskTier) -> Vec<&HealthCondition> {
        self.conditions
            .iter()
            .filter(|condition| condition.tier == tier)
            .collect()
    }

    /// Case-insensitive substring search over name, description, category, and symptoms.
    pub fn search_conditions(&self, keyword: &str) -> Vec<HealthCondition> {
        self.conditions
            .iter()
            .filter(|condition| condition.matches(keyword))
            .cloned()
            .collect()
    }

    /// All entries ordered CRITICAL first.
    pub fn form_entries(&self) -> Vec<ConditionFormEntry> {
        let mut entries: Vec<ConditionFormEntry> = self
            .conditions
            .iter()
            .map(|condition| ConditionFormEntry {
                key: condition.key.clone(),
                name: condition.name.clone(),
                description: condition.description.clone(),
                tier: condition.tier,
                category: condition.category.clone(),
            })
            .collect();
        entries.sort_by(|a, b| b.tier.cmp(&a.tier));
        entries
    }
}

impl Default for HealthCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[allow(clippy::too_many_arguments)]
fn condition(
    key: &str,
    name: &str,
    description: &str,
    tier: HealthRiskTier,
    base_risk: f64,
    remediation: &str,
    symptoms: &[&str],
    category: &str,
) -> HealthCondition {
    HealthCondition {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        tier,
        base_risk,
        blocks_mission: tier == HealthRiskTier::Critical,
        remediation: remediation.to_string(),
        symptoms: symptoms.iter().map(|symptom| symptom.to_string()).collect(),
        category: category.to_string(),
    }
}

fn standard_conditions() -> Vec<HealthCondition> {
    use HealthRiskTier::*;

    vec![
        condition(
            "heart-disease",
            "Heart Disease",
            "Cardiovascular conditions including coronary artery disease, heart failure, \
             arrhythmias",
            Critical,
            0.95,
            "Must be fully treated and cleared by cardiologist",
            &["chest pain", "shortness of breath", "irregular heartbeat", "fatigue"],
            "cardiovascular",
        ),
        condition(
            "cancer-active",
            "Active Cancer",
            "Currently undergoing cancer treatment or active cancer diagnosis",
            Critical,
            0.90,
            "Must be in complete remission for at least 2 years",
            &["unexplained weight loss", "fatigue", "pain", "lumps"],
            "oncology",
        ),
        condition(
            "severe-respiratory",
            "Severe Respiratory Disease",
            "Severe asthma, COPD, or other chronic respiratory conditions",
            Critical,
            0.85,
            "Must be well-controlled with medication",
            &["severe shortness of breath", "wheezing", "chronic cough"],
            "respiratory",
        ),
        condition(
            "diabetes-uncontrolled",
            "Uncontrolled Diabetes",
            "Poorly controlled diabetes with frequent complications",
            Critical,
            0.80,
            "Must have stable blood glucose levels for 6+ months",
            &["frequent urination", "excessive thirst", "fatigue", "blurred vision"],
            "endocrine",
        ),
        condition(
            "severe-mental-health",
            "Severe Mental Health Conditions",
            "Severe depression, bipolar disorder, schizophrenia, or other serious mental health \
             conditions",
            Critical,
            0.75,
            "Must be stable on medication for 1+ year",
            &["severe mood swings", "hallucinations", "suicidal thoughts"],
            "psychiatric",
        ),
        condition(
            "hypertension",
            "Hypertension",
            "High blood pressure requiring medication",
            High,
            0.65,
            "Must be well-controlled with medication",
            &["headaches", "dizziness", "chest pain"],
            "cardiovascular",
        ),
        condition(
            "diabetes-controlled",
            "Controlled Diabetes",
            "Well-controlled diabetes with stable blood glucose",
            High,
            0.60,
            "Regular monitoring and medication compliance",
            &["increased thirst", "frequent urination"],
            "endocrine",
        ),
        condition(
            "asthma-mild",
            "Mild Asthma",
            "Well-controlled asthma with infrequent symptoms",
            High,
            0.55,
            "Inhaler available and symptoms under control",
            &["occasional wheezing", "mild shortness of breath"],
            "respiratory",
        ),
        condition(
            "epilepsy-controlled",
            "Controlled Epilepsy",
            "Epilepsy that is well-controlled with medication",
            High,
            0.70,
            "Seizure-free for 2+ years on medication",
            &["seizures", "loss of consciousness"],
            "neurological",
        ),
        condition(
            "depression-mild",
            "Mild Depression",
            "Mild to moderate depression under treatment",
            High,
            0.50,
            "Stable on medication and therapy",
            &["sadness", "fatigue", "sleep changes"],
            "psychiatric",
        ),
        condition(
            "allergies-severe",
            "Severe Allergies",
            "Severe food or environmental allergies",
            Moderate,
            0.40,
            "EpiPen available and allergy management plan",
            &["severe allergic reactions", "anaphylaxis risk"],
            "immunological",
        ),
        condition(
            "migraines",
            "Migraines",
            "Frequent or severe migraine headaches",
            Moderate,
            0.35,
            "Medication available and trigger avoidance",
            &["severe headaches", "nausea", "light sensitivity"],
            "neurological",
        ),
        condition(
            "back-pain-chronic",
            "Chronic Back Pain",
            "Chronic back pain requiring regular treatment",
            Moderate,
            0.30,
            "Physical therapy and pain management",
            &["chronic pain", "limited mobility"],
            "musculoskeletal",
        ),
        condition(
            "sleep-apnea",
            "Sleep Apnea",
            "Sleep apnea requiring CPAP or other treatment",
            Moderate,
            0.45,
            "CPAP machine available",
            &["loud snoring", "daytime fatigue", "breathing pauses"],
            "respiratory",
        ),
        condition(
            "anxiety-mild",
            "Mild Anxiety",
            "Mild anxiety or panic attacks",
            Moderate,
            0.25,
            "Therapy and/or medication as needed",
            &["worry", "panic attacks", "restlessness"],
            "psychiatric",
        ),
        condition(
            "cough",
            "Cough",
            "Minor cough or cold symptoms",
            Low,
            0.15,
            "Over-the-counter medication",
            &["coughing", "sore throat", "mild congestion"],
            "respiratory",
        ),
        condition(
            "headache-occasional",
            "Occasional Headaches",
            "Infrequent tension headaches",
            Low,
            0.10,
            "Over-the-counter pain relievers",
            &["mild headaches", "tension"],
            "neurological",
        ),
        condition(
            "allergies-mild",
            "Mild Allergies",
            "Seasonal or mild environmental allergies",
            Low,
            0.12,
            "Antihistamines as needed",
            &["sneezing", "runny nose", "itchy eyes"],
            "immunological",
        ),
        condition(
            "insomnia-mild",
            "Mild Insomnia",
            "Occasional difficulty sleeping",
            Low,
            0.08,
            "Sleep hygiene practices",
            &["difficulty falling asleep", "waking up frequently"],
            "sleep",
        ),
        condition(
            "mild-anxiety",
            "Very Mild Anxiety",
            "Occasional nervousness or stress",
            Low,
            0.05,
            "Stress management techniques",
            &["occasional worry", "mild stress"],
            "psychiatric",
        ),
    ]
}
