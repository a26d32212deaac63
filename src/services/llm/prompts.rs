use std::path::Path;
use tracing::debug;

pub const EXTRACTION_PROMPT_FILE: &str = "extraction_prompt.txt";
pub const INSIGHTS_PROMPT_FILE: &str = "insights_prompt.txt";

const FALLBACK_EXTRACTION_PROMPT: &str = "\
EXTRACT W-2 INFORMATION TO JSON
Extract all W-2 tax form fields into structured JSON format.
Include employee info, employer info, federal tax data, and state/local data.
Use this shape: {\"employee\": {\"name\", \"ssn\", \"address\": {\"street\", \"city\", \"state\", \"zip\"}}, \
\"employer\": {\"name\", \"ein\", \"address\", \"state_id\"}, \"federal\": {\"wages_tips\", \"federal_income_tax\", \
\"social_security_wages\", \"social_security_tax\", \"medicare_wages\", \"medicare_tax\", \"social_security_tips\", \
\"allocated_tips\", \"dependent_care_benefits\", \"nonqualified_plans\"}, \"state_local\": [{\"state\", \
\"employer_state_id\", \"state_wages\", \"state_income_tax\"}], \"other_boxes\": {\"box_12\", \"box_13\", \"box_14\"}}
Mask SSN and EIN to last 4 digits only.
Return ONLY valid JSON, no other text.";

const FALLBACK_INSIGHTS_PROMPT: &str = "\
Generate 5-8 concise insights for this W-2 data:
{extracted_data}

Employee Address: {employee_address}

Focus on:
- Address validation
- Tax withholding analysis
- Social Security & Medicare
- Data quality issues
- Follow-up actions

Return JSON: {\"insights\": [\"• insight 1\", \"• insight 2\", ...]}";

/// Prompt templates sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    pub extraction: String,
    pub insights: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            extraction: FALLBACK_EXTRACTION_PROMPT.to_string(),
            insights: FALLBACK_INSIGHTS_PROMPT.to_string(),
        }
    }
}

fn read_prompt(dir: &Path, file_name: &str, fallback: &str) -> String {
    let path = dir.join(file_name);
    match std::fs::read_to_string(&path) {
        Ok(prompt) if !prompt.trim().is_empty() => {
            debug!("Loaded prompt from {}", path.display());
            prompt
        }
        _ => {
            debug!("Using built-in prompt, {} not available", path.display());
            fallback.to_string()
        }
    }
}

impl PromptSet {
    /// Load prompts from `dir`, falling back to the built-in ones for any
    /// file that is missing or empty.
    pub fn load(dir: &Path) -> Self {
        Self {
            extraction: read_prompt(dir, EXTRACTION_PROMPT_FILE, FALLBACK_EXTRACTION_PROMPT),
            insights: read_prompt(dir, INSIGHTS_PROMPT_FILE, FALLBACK_INSIGHTS_PROMPT),
        }
    }

    pub fn extraction_prompt(&self, text_content: &str) -> String {
        format!("{}\n\nW-2 CONTENT:\n{}", self.extraction, text_content)
    }

    pub fn insights_prompt(&self, extracted_data: &str, employee_address: &str) -> String {
        self.insights
            .replace("{extracted_data}", extracted_data)
            .replace("{employee_address}", employee_address)
    }
}
