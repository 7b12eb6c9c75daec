use std::str::FromStr;

use nom::{
	branch::alt,
	bytes::complete::{escaped_transform, is_not},
	character::complete::char,
	combinator::{all_consuming, eof, map, value, verify},
	multi::separated_list1,
	Finish, IResult,
};
use schemars::JsonSchema;
use serde::{de, Deserialize};

use super::error::Error;

/// A comma-separated list of values, i.e. `a,b` selects both `a` and `b`.
///
/// Values containing a comma or backslash must escape it with a backslash,
/// i.e. `a\,b` is the single value `a,b`. Empty values are not permitted. An
/// empty string is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct ListString(#[schemars(with = "String")] Vec<String>);

impl ListString {
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Escape a single value so it survives a round trip as one list item.
	pub fn escape(value: &str) -> String {
		let mut escaped = String::with_capacity(value.len());
		for character in value.chars() {
			if matches!(character, '\\' | ',') {
				escaped.push('\\');
			}
			escaped.push(character);
		}
		escaped
	}
}

impl FromStr for ListString {
	type Err = Error;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let (_, items) = all_consuming(list)(input)
			.finish()
			.map_err(|error| Error::Invalid(format!("malformed list \"{input}\": {error}")))?;

		Ok(Self(items))
	}
}

impl<'de> Deserialize<'de> for ListString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(de::Error::custom)
	}
}

fn list(input: &str) -> IResult<&str, Vec<String>> {
	alt((map(eof, |_| vec![]), separated_list1(char(','), item)))(input)
}

fn item(input: &str) -> IResult<&str, String> {
	let escaped_item = escaped_transform(
		is_not("\\,"),
		'\\',
		alt((value("\\", char('\\')), value(",", char(',')))),
	);

	verify(escaped_item, |item: &str| !item.is_empty())(input)
}

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;

	use super::*;

	fn parse(input: &str) -> Vec<String> {
		input
			.parse::<ListString>()
			.expect("list should parse")
			.iter()
			.map(str::to_owned)
			.collect()
	}

	#[test]
	fn empty() {
		assert_eq!(parse(""), Vec::<String>::new());
	}

	#[test]
	fn single() {
		assert_eq!(parse("攻擊力"), vec!["攻擊力"]);
	}

	#[test]
	fn multiple() {
		assert_eq!(parse("火,水,暗"), vec!["火", "水", "暗"]);
	}

	#[test]
	fn escapes() {
		assert_eq!(parse(r"a\,b,c\\d"), vec!["a,b", r"c\d"]);
	}

	#[test]
	fn escape_survives_parse() {
		let value = r"暴擊\傷害,加成";
		assert_eq!(parse(&ListString::escape(value)), vec![value]);
	}

	#[test]
	fn empty_item_rejected() {
		assert!("a,,b".parse::<ListString>().is_err());
		assert!("a,".parse::<ListString>().is_err());
		assert!(",a".parse::<ListString>().is_err());
	}

	#[test]
	fn dangling_escape_rejected() {
		assert!(r"a\".parse::<ListString>().is_err());
		assert!(r"a\b".parse::<ListString>().is_err());
	}

	#[test]
	fn deserialize() {
		let list = serde_json::from_str::<ListString>(r#""1,2""#).expect("list should deserialize");
		assert_eq!(list.iter().collect::<Vec<_>>(), vec!["1", "2"]);

		assert!(serde_json::from_str::<ListString>(r#""1,,2""#).is_err());
	}
}
