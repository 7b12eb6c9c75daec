use std::{borrow::Cow, sync::OnceLock};

use regex::{Captures, Regex};

use crate::catalog::EffectValue;

/// Factor applied to effect values when showing max-level figures.
pub const MAX_LEVEL_FACTOR: f64 = 6.0;

/// Scale an effect value for display.
///
/// Numbers are multiplied and printed with one decimal place. Text has every
/// embedded number scaled in place, leaving surrounding symbols untouched.
pub fn scale_numbers(value: &EffectValue, factor: f64) -> String {
	match value {
		EffectValue::Number(number) => {
			scale_one(*number, factor).unwrap_or_else(|| number.to_string())
		}
		EffectValue::Text(text) => scale_text(text, factor).into_owned(),
	}
}

/// Display text for an effect value, scaled by the factor if one is given.
pub fn display_value(value: &EffectValue, factor: Option<f64>) -> String {
	match factor {
		Some(factor) => scale_numbers(value, factor),
		None => value.to_string(),
	}
}

/// Scale every number embedded in the text.
pub fn scale_text(text: &str, factor: f64) -> Cow<'_, str> {
	static NUMBER: OnceLock<Regex> = OnceLock::new();
	let number = NUMBER.get_or_init(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("static regex"));

	number.replace_all(text, |captures: &Captures<'_>| {
		let matched = &captures[0];
		matched
			.parse::<f64>()
			.ok()
			.and_then(|value| scale_one(value, factor))
			.unwrap_or_else(|| matched.to_string())
	})
}

fn scale_one(value: f64, factor: f64) -> Option<String> {
	let scaled = value * factor;
	if !scaled.is_finite() {
		return None;
	}

	// Avoid printing "-0.0" for a negative zero product.
	let scaled = if scaled == 0.0 { 0.0 } else { scaled };

	// Values exactly halfway between tenths round away from zero. The only
	// such values a double can hold end in .25 or .75, i.e. an odd number of
	// quarters. `{:.1}` would round those to even.
	let quarters = scaled * 4.0;
	let scaled = match quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
		true => (scaled * 10.0).round() / 10.0,
		false => scaled,
	};

	Some(format!("{scaled:.1}"))
}
