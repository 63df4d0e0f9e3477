use crate::error::RuleError;
use crate::validate::ValidatorFn;
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

// Relative references are resolved against this before giving up.
static RELATIVE_BASE: Lazy<Url> =
	Lazy::new(|| Url::parse("http://localhost/").expect("valid base URL"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

/// A fresh copy of the built-in rule table.
pub fn builtin_validators() -> HashMap<String, ValidatorFn> {
	let rules: [(&str, ValidatorFn); 6] = [
		("required", Arc::new(required)),
		("url", Arc::new(url)),
		("email", Arc::new(email)),
		("range", Arc::new(range)),
		("min", Arc::new(min)),
		("max", Arc::new(max)),
	];

	rules
		.into_iter()
		.map(|(name, rule)| (name.to_string(), rule))
		.collect()
}

fn required(value: &Value, _param: &str) -> Result<(), RuleError> {
	if value.is_null() || value.to_string().is_empty() {
		return Err("field is required".into());
	}
	Ok(())
}

fn url(value: &Value, _param: &str) -> Result<(), RuleError> {
	let text = value.to_string();
	let parsed = match Url::parse(&text) {
		Err(url::ParseError::RelativeUrlWithoutBase) => RELATIVE_BASE.join(&text),
		other => other,
	};
	parsed.map(|_| ()).map_err(|_| "invalid URL format".into())
}

fn email(value: &Value, _param: &str) -> Result<(), RuleError> {
	if !EMAIL_RE.is_match(&value.to_string()) {
		return Err("invalid email format".into());
	}
	Ok(())
}

fn range(value: &Value, param: &str) -> Result<(), RuleError> {
	let parts: Vec<&str> = param.split(',').collect();
	let [lo, hi] = parts.as_slice() else {
		return Err("range validator requires min,max parameters".into());
	};
	let (Ok(lo), Ok(hi)) = (lo.trim().parse::<i64>(), hi.trim().parse::<i64>()) else {
		return Err("range parameters must be integers".into());
	};

	let n = integer_value(value)
		.ok_or_else(|| RuleError::from("value must be an integer for range validation"))?;

	if n < lo || n > hi {
		return Err(format!("value must be between {lo} and {hi}").into());
	}
	Ok(())
}

fn min(value: &Value, param: &str) -> Result<(), RuleError> {
	let bound = param
		.trim()
		.parse::<i64>()
		.map_err(|_| RuleError::from("min parameter must be an integer"))?;
	let n = integer_value(value)
		.ok_or_else(|| RuleError::from("value must be an integer for min validation"))?;

	if n < bound {
		return Err(format!("value must be at least {bound}").into());
	}
	Ok(())
}

fn max(value: &Value, param: &str) -> Result<(), RuleError> {
	let bound = param
		.trim()
		.parse::<i64>()
		.map_err(|_| RuleError::from("max parameter must be an integer"))?;
	let n = integer_value(value)
		.ok_or_else(|| RuleError::from("value must be an integer for max validation"))?;

	if n > bound {
		return Err(format!("value must be at most {bound}").into());
	}
	Ok(())
}

/// Integer reading of a value via its canonical string form.
fn integer_value(value: &Value) -> Option<i64> {
	value.to_string().parse::<i64>().ok()
}
