//! Existence rules. These must see undefined values, so they all compile with
//! `allow_undefineds`.

use serde_json::{Value, json};

use super::{CompiledRule, Rule, RuleContext};
use crate::errors::BuildError;

/// A value is "blank" when it is undefined, null or the empty string.
/// `false` and `0` are present values.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// Fails when the value is undefined, null or an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Required {
    pub const NAME: &'static str = "required";
    const MESSAGE: &'static str = "required validation failed";
}

impl Rule for Required {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        _subtype: Option<&str>,
        _is_array_member: bool,
        _args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        Ok(CompiledRule::new(Self::NAME).allow_undefineds())
    }

    fn validate(&self, value: Option<&Value>, _options: &Value, ctx: &mut RuleContext<'_>) {
        if is_blank(value) {
            ctx.report(Self::NAME, Self::MESSAGE);
        }
    }
}

/// Required only when every one of the named fields is missing.
///
/// Takes one argument, the array of field references. Each reference is
/// resolved with the field resolver, so `"/email"` looks at the document root
/// and `"email"` at the enclosing container.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredIfNotExistsAll;

impl RequiredIfNotExistsAll {
    pub const NAME: &'static str = "requiredIfNotExistsAll";
    const MESSAGE: &'static str = "requiredIfNotExistsAll validation failed";
}

impl Rule for RequiredIfNotExistsAll {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        _subtype: Option<&str>,
        _is_array_member: bool,
        args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        let fields = match args.first() {
            None | Some(Value::Null) => {
                return Err(BuildError::invalid_arguments(
                    Self::NAME,
                    "expects an array of \"fields\"",
                ));
            }
            Some(Value::Array(fields)) => fields,
            Some(_) => {
                return Err(BuildError::invalid_arguments(
                    Self::NAME,
                    "expects \"fields\" to be an array",
                ));
            }
        };

        if !fields.iter().all(Value::is_string) {
            return Err(BuildError::invalid_arguments(
                Self::NAME,
                "expects \"fields\" to contain field names",
            ));
        }

        Ok(CompiledRule::new(Self::NAME)
            .allow_undefineds()
            .with_options(json!({ "fields": fields })))
    }

    fn validate(&self, value: Option<&Value>, options: &Value, ctx: &mut RuleContext<'_>) {
        let Some(fields) = options.get("fields").and_then(Value::as_array) else {
            return;
        };

        let all_fields_missing = fields
            .iter()
            .filter_map(Value::as_str)
            .all(|field| matches!(ctx.resolve(field), None | Some(Value::Null)));

        if all_fields_missing && is_blank(value) {
            ctx.report(Self::NAME, Self::MESSAGE);
        }
    }
}
