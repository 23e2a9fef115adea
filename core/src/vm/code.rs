use alloc::sync::Arc;
use core::fmt;

use crate::rules::{CompiledRule, Rule};
use crate::vm::instruction_set::{Binding, Instruction, Key, Pointer, RuleId, escape};

/// A compiled rule together with the implementation that runs it.
#[derive(Clone)]
pub struct BoundRule {
    pub compiled: CompiledRule,
    pub rule: Arc<dyn Rule>,
}

impl fmt::Debug for BoundRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRule")
            .field("compiled", &self.compiled)
            .finish_non_exhaustive()
    }
}

/// The compiled validation procedure for one schema.
///
/// Immutable once built; one program can validate any number of inputs,
/// concurrently if needed.
#[derive(Clone)]
pub struct Program {
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) rules: Vec<BoundRule>,
    pub(crate) num_bindings: usize,
    pub(crate) num_outputs: usize,
    pub(crate) num_indices: usize,
    /// Render `// Validate ...` comments in the source text.
    pub(crate) comments: bool,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn rules(&self) -> &[BoundRule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> &BoundRule {
        &self.rules[id.0 as usize]
    }

    /// Number of distinct bindings minted for this program.
    pub fn num_bindings(&self) -> usize {
        self.num_bindings
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn num_indices(&self) -> usize {
        self.num_indices
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether any rule suspends, requiring [`Program::run_async`].
    pub fn is_async(&self) -> bool {
        self.rules.iter().any(|bound| bound.compiled.is_async)
    }

    /// All bindings read by `Bind` instructions, in emission order.
    pub fn bindings(&self) -> Vec<Binding> {
        self.instructions
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Bind { binding, .. } => Some(*binding),
                _ => None,
            })
            .collect()
    }
}

/// Lines of rendered source, indented two spaces per block level.
#[derive(Default)]
struct SourceWriter {
    lines: Vec<String>,
    indent: usize,
}

impl SourceWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let mut line = "  ".repeat(self.indent);
        line.push_str(text.as_ref());
        self.lines.push(line);
    }

    /// Blank line between statement groups, never at the start of the output
    /// or of a block.
    fn separate(&mut self) {
        if let Some(last) = self.lines.last()
            && !last.is_empty()
            && !last.ends_with('{')
        {
            self.lines.push(String::new());
        }
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }
}

impl Program {
    fn render(&self) -> Result<Vec<String>, fmt::Error> {
        let mut w = SourceWriter::default();

        for instruction in &self.instructions {
            match instruction {
                Instruction::Bind {
                    binding,
                    source,
                    key,
                } => {
                    w.separate();
                    if self.comments {
                        w.line(format!("// Validate {source}{}", key.subscript()));
                    }
                    w.line(format!("let {binding} = {source}{};", key.subscript()));
                    w.line(format!(
                        "let {binding}_exists = helpers.exists({binding});"
                    ));
                }
                Instruction::MutateHook { binding } => {
                    w.open(format!("function mutate_{binding} (newValue) {{"));
                    w.line(format!("{binding} = newValue;"));
                    w.line(format!("{binding}_exists = helpers.exists({binding});"));
                    w.close();
                }
                Instruction::Context {
                    binding,
                    tip,
                    field,
                    pointer,
                } => {
                    w.open(format!("const {binding}_options = {{"));
                    w.line("root,");
                    match field {
                        Key::Name(name) => w.line(format!("field: '{}',", escape(name))),
                        Key::Index(index) => w.line(format!("field: {index},")),
                    }
                    w.line(format!("tip: {tip},"));
                    w.line(format!("pointer: {},", render_pointer(pointer)));
                    if let Some(expression) = pointer.array_expression() {
                        w.line(format!(
                            "arrayExpressionPointer: '{}',",
                            escape(&expression)
                        ));
                    }
                    w.line(format!("mutate: mutate_{binding},"));
                    w.line("errorReporter");
                    w.indent = w.indent.saturating_sub(1);
                    w.line("};");
                }
                Instruction::Validate { binding, rule } => {
                    let compiled = &self.rule(*rule).compiled;
                    let options =
                        serde_json::to_string(&compiled.compiled_options).map_err(|_| fmt::Error)?;
                    let guard = if compiled.allow_undefineds {
                        String::new()
                    } else {
                        format!("{binding}_exists && ")
                    };
                    let call = if compiled.is_async { "await " } else { "" };
                    w.line(format!(
                        "{guard}{call}validations.{}.validate({binding}, {options}, {binding}_options);",
                        compiled.name
                    ));
                }
                Instruction::CopyIfExists { binding, out, key } => {
                    w.open(format!("if ({binding}_exists) {{"));
                    w.line(format!("{out}{} = {binding};", key.subscript()));
                    w.close();
                }
                Instruction::GuardObject { binding, .. } => {
                    w.separate();
                    w.open(format!(
                        "if ({binding}_exists && helpers.isObject({binding})) {{"
                    ));
                }
                Instruction::GuardArray { binding, .. } => {
                    w.separate();
                    w.open(format!(
                        "if ({binding}_exists && helpers.isArray({binding})) {{"
                    ));
                }
                Instruction::NewObject { out, parent, key } => {
                    w.line(format!("const {out} = {parent}{} = {{}};", key.subscript()));
                }
                Instruction::NewArray { out, parent, key } => {
                    w.line(format!("const {out} = {parent}{} = [];", key.subscript()));
                }
                Instruction::IterBegin { array, index, .. } => {
                    w.open(format!(
                        "for (let {index} = 0; {index} < {array}.length; {index}++) {{"
                    ));
                }
                Instruction::IterNext { .. } | Instruction::EndGuard => w.close(),
            }
        }

        Ok(w.lines)
    }
}

fn render_pointer(pointer: &Pointer) -> String {
    if pointer.has_index() {
        format!("`{}`", pointer.join_with(|index| format!("${{{index}}}")))
    } else {
        format!("'{}'", escape(&pointer.join_with(|index| index.to_string())))
    }
}

/// Renders the source text the instruction sequence is equivalent to.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render()? {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program {{")?;
        writeln!(f, "  num_bindings: {}", self.num_bindings)?;
        writeln!(f, "  num_outputs: {}", self.num_outputs)?;
        writeln!(f, "  num_indices: {}", self.num_indices)?;

        if self.rules.is_empty() {
            writeln!(f, "  rules: []")?;
        } else {
            writeln!(f, "  rules: [")?;
            for (i, bound) in self.rules.iter().enumerate() {
                writeln!(f, "    [{i}] = {:?}", bound.compiled)?;
            }
            writeln!(f, "  ]")?;
        }

        writeln!(f, "  instructions: [")?;
        for (addr, instruction) in self.instructions.iter().enumerate() {
            let target = match instruction {
                Instruction::GuardObject { skip, .. }
                | Instruction::GuardArray { skip, .. }
                | Instruction::IterBegin { skip, .. } => {
                    Some(format!("  -> {}", addr + 1 + *skip as usize))
                }
                Instruction::IterNext { back, .. } => {
                    Some(format!("  -> {}", (addr + 1).saturating_sub(*back as usize)))
                }
                _ => None,
            };
            writeln!(
                f,
                "    {addr:4}  {instruction:?}{}",
                target.unwrap_or_default()
            )?;
        }
        writeln!(f, "  ]")?;
        write!(f, "}}")
    }
}
