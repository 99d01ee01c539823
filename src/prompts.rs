pub const SYNTHESIS_INSTRUCTION: &str = include_str!("../data/prompts/synthesis.txt");

/// Literal constraint every instruction carries.
pub const CODE_ONLY_CONSTRAINT: &str = "Return ONLY the code, no prose.";

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
