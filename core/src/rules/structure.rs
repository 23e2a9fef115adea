//! Structural rules for object and array nodes.

use serde_json::Value;

use super::{CompiledRule, Rule, RuleContext, ensure_subtype};
use crate::errors::BuildError;
use crate::values::{is_array, is_object};

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectRule;

impl ObjectRule {
    pub const NAME: &'static str = "object";
}

impl Rule for ObjectRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        subtype: Option<&str>,
        _is_array_member: bool,
        _args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        ensure_subtype(Self::NAME, subtype, &["object"])?;
        Ok(CompiledRule::new(Self::NAME))
    }

    fn validate(&self, value: Option<&Value>, _options: &Value, ctx: &mut RuleContext<'_>) {
        if !is_object(value) {
            ctx.report(Self::NAME, "object validation failed");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRule;

impl ArrayRule {
    pub const NAME: &'static str = "array";
}

impl Rule for ArrayRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        subtype: Option<&str>,
        _is_array_member: bool,
        _args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        ensure_subtype(Self::NAME, subtype, &["array"])?;
        Ok(CompiledRule::new(Self::NAME))
    }

    fn validate(&self, value: Option<&Value>, _options: &Value, ctx: &mut RuleContext<'_>) {
        if !is_array(value) {
            ctx.report(Self::NAME, "array validation failed");
        }
    }
}
