use uuid::Uuid;

use rubric_core::config::Backend;
use rubric_core::grader::GradeInput;

/// Parse a backend name
pub fn parse_backend(s: &str) -> std::result::Result<Backend, String> {
    s.parse::<Backend>().map_err(|e| e.to_string())
}

/// Parse a grading method id
pub fn parse_method_id(s: &str) -> std::result::Result<Uuid, String> {
    Uuid::parse_str(s.trim()).map_err(|e| format!("invalid grading method id '{}': {}", s, e))
}

/// Parse `path=value`. The last `=` splits, so paths may contain `=`.
pub fn parse_grade_input(s: &str) -> std::result::Result<GradeInput, String> {
    let (path, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", s))?;

    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing path in '{}'", s));
    }

    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{}' for '{}'", value.trim(), path))?;
    if !value.is_finite() {
        return Err(format!("value for '{}' must be finite", path));
    }

    Ok(GradeInput::new(path, value))
}
