use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::code::Program;
use super::instruction_set::{Binding, Instruction, Key, OutRef, RuleId, Source};

use crate::errors::ExecutionError;
use crate::reporter::ErrorReporter;
use crate::rules::{Field, MutateCell, RuleContext};
use crate::values::{exists, get_field, get_index, is_array, is_object};

/// Runtime validation context of one binding, built by `Context`.
struct FieldContext<'p> {
    tip: Source,
    field: Field<'p>,
    pointer: String,
    array_expression_pointer: Option<String>,
}

/// An output container. Nested containers are attached to their parent only
/// when the program finishes; until then the parent holds a placeholder at
/// the container's key.
struct OutputNode<'p> {
    value: Value,
    parent: Option<(usize, Field<'p>)>,
}

enum Step {
    Next,
    Invoke { binding: Binding, rule: RuleId },
    Done,
}

/// Executes one [`Program`] against one input document.
pub struct VM<'p, 'i, 'r> {
    program: &'p Program,
    root: &'i Value,
    ip: usize,
    slots: Vec<Option<Value>>,
    contexts: Vec<Option<FieldContext<'p>>>,
    indices: Vec<usize>,
    out_handles: Vec<usize>,
    outputs: Vec<OutputNode<'p>>,
    reporter: &'r mut dyn ErrorReporter,
}

impl<'p, 'i, 'r> VM<'p, 'i, 'r> {
    pub fn new(program: &'p Program, root: &'i Value, reporter: &'r mut dyn ErrorReporter) -> Self {
        let mut slots = Vec::with_capacity(program.num_bindings);
        slots.resize_with(program.num_bindings, || None);
        let mut contexts = Vec::with_capacity(program.num_bindings);
        contexts.resize_with(program.num_bindings, || None);

        VM {
            program,
            root,
            ip: 0,
            slots,
            contexts,
            indices: vec![0; program.num_indices],
            out_handles: vec![0; program.num_outputs],
            outputs: vec![OutputNode {
                value: Value::Object(Map::new()),
                parent: None,
            }],
            reporter,
        }
    }

    /// Run to completion. Fails before executing anything if the program
    /// contains an async rule, whatever the input.
    pub fn run(mut self) -> Result<Value, ExecutionError> {
        if let Some(bound) = self.program.rules.iter().find(|bound| bound.compiled.is_async) {
            return Err(ExecutionError::AsyncRule {
                rule: bound.compiled.name.clone(),
            });
        }

        loop {
            match self.step() {
                Step::Next => {}
                Step::Invoke { binding, rule } => {
                    self.invoke(binding, rule);
                    if self.halted() {
                        break;
                    }
                }
                Step::Done => break,
            }
        }
        self.finish()
    }

    /// Run to completion, awaiting async rules in place.
    pub async fn run_async(mut self) -> Result<Value, ExecutionError> {
        loop {
            match self.step() {
                Step::Next => {}
                Step::Invoke { binding, rule } => {
                    if self.program.rule(rule).compiled.is_async {
                        self.invoke_async(binding, rule).await;
                    } else {
                        self.invoke(binding, rule);
                    }
                    if self.halted() {
                        break;
                    }
                }
                Step::Done => break,
            }
        }
        self.finish()
    }

    fn step(&mut self) -> Step {
        let program = self.program;
        let Some(instruction) = program.instructions.get(self.ip) else {
            return Step::Done;
        };
        self.ip += 1;

        use Instruction::*;
        match instruction {
            Bind {
                binding,
                source,
                key,
            } => {
                let container = self.source(*source);
                let value = match key {
                    Key::Name(name) => get_field(container, name),
                    Key::Index(index) => get_index(container, self.indices[index.0 as usize]),
                };
                let value = value.cloned();
                let slot = binding.0 as usize;
                self.slots[slot] = value;
                self.contexts[slot] = None;
            }
            // Rule write-backs go through a fresh MutateCell per invocation.
            MutateHook { .. } => {}
            Context {
                binding,
                tip,
                field,
                pointer,
            } => {
                let indices = &self.indices;
                let context = FieldContext {
                    tip: *tip,
                    field: self.field(field),
                    pointer: pointer.join_with(|index| indices[index.0 as usize].to_string()),
                    array_expression_pointer: pointer.array_expression(),
                };
                self.contexts[binding.0 as usize] = Some(context);
            }
            Validate { binding, rule } => {
                let compiled = &program.rule(*rule).compiled;
                if !compiled.allow_undefineds && !exists(self.slot(*binding)) {
                    trace!(rule = %compiled.name, binding = %binding, "skipping rule on absent value");
                    return Step::Next;
                }
                return Step::Invoke {
                    binding: *binding,
                    rule: *rule,
                };
            }
            CopyIfExists { binding, out, key } => {
                if let Some(value) = self.slot(*binding).filter(|v| !v.is_null()) {
                    let value = value.clone();
                    let key = self.field(key);
                    let handle = self.handle(*out);
                    insert(&mut self.outputs[handle].value, key, value);
                }
            }
            GuardObject { binding, skip } => {
                if !is_object(self.slot(*binding)) {
                    self.ip += *skip as usize;
                }
            }
            GuardArray { binding, skip } => {
                if !is_array(self.slot(*binding)) {
                    self.ip += *skip as usize;
                }
            }
            NewObject { out, parent, key } => {
                self.open_container(out.0 as usize, *parent, key, Value::Object(Map::new()));
            }
            NewArray { out, parent, key } => {
                self.open_container(out.0 as usize, *parent, key, Value::Array(Vec::new()));
            }
            IterBegin { array, index, skip } => {
                let len = self
                    .slot(*array)
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                let position = &mut self.indices[index.0 as usize];
                if *position >= len {
                    *position = 0;
                    self.ip += *skip as usize;
                }
            }
            IterNext { index, back } => {
                self.indices[index.0 as usize] += 1;
                self.ip -= *back as usize;
            }
            EndGuard => {}
        }
        Step::Next
    }

    fn invoke(&mut self, binding: Binding, rule: RuleId) {
        let program = self.program;
        let bound = program.rule(rule);
        let slot = binding.0 as usize;
        let value = self.slots[slot].take();
        let mut cell = MutateCell::new();

        if let Some(context) = self.contexts[slot].as_ref() {
            let tip = match context.tip {
                Source::Root => Some(self.root),
                Source::Binding(parent) => self.slots[parent.0 as usize].as_ref(),
            };
            let mut ctx = RuleContext::new(
                self.root,
                context.field,
                &context.pointer,
                &mut cell,
                &mut *self.reporter,
            )
            .with_tip(tip)
            .with_array_expression_pointer(context.array_expression_pointer.as_deref());

            trace!(rule = %bound.compiled.name, pointer = %context.pointer, "validating");
            bound
                .rule
                .validate(value.as_ref(), &bound.compiled.compiled_options, &mut ctx);
        }

        self.slots[slot] = cell.take().or(value);
    }

    async fn invoke_async(&mut self, binding: Binding, rule: RuleId) {
        let program = self.program;
        let bound = program.rule(rule);
        let slot = binding.0 as usize;
        let value = self.slots[slot].take();
        let mut cell = MutateCell::new();

        if let Some(context) = self.contexts[slot].as_ref() {
            let tip = match context.tip {
                Source::Root => Some(self.root),
                Source::Binding(parent) => self.slots[parent.0 as usize].as_ref(),
            };
            let mut ctx = RuleContext::new(
                self.root,
                context.field,
                &context.pointer,
                &mut cell,
                &mut *self.reporter,
            )
            .with_tip(tip)
            .with_array_expression_pointer(context.array_expression_pointer.as_deref());

            trace!(rule = %bound.compiled.name, pointer = %context.pointer, "validating (async)");
            bound
                .rule
                .validate_async(value.as_ref(), &bound.compiled.compiled_options, &mut ctx)
                .await;
        }

        self.slots[slot] = cell.take().or(value);
    }

    fn halted(&self) -> bool {
        let halted = self.reporter.should_halt();
        if halted {
            debug!(ip = self.ip, "reporter requested halt");
        }
        halted
    }

    fn finish(mut self) -> Result<Value, ExecutionError> {
        self.reporter.finish()?;
        Ok(self.assemble())
    }

    /// Attach every nested container to its parent, innermost first.
    fn assemble(mut self) -> Value {
        while self.outputs.len() > 1 {
            let Some(node) = self.outputs.pop() else {
                break;
            };
            if let Some((parent, key)) = node.parent {
                insert(&mut self.outputs[parent].value, key, node.value);
            }
        }
        self.outputs
            .pop()
            .map_or_else(|| Value::Object(Map::new()), |root| root.value)
    }

    fn open_container(&mut self, out: usize, parent: OutRef, key: &'p Key, empty: Value) {
        let parent = self.handle(parent);
        let key = self.field(key);
        insert(&mut self.outputs[parent].value, key, Value::Null);

        self.out_handles[out] = self.outputs.len();
        self.outputs.push(OutputNode {
            value: empty,
            parent: Some((parent, key)),
        });
    }

    fn slot(&self, binding: Binding) -> Option<&Value> {
        self.slots[binding.0 as usize].as_ref()
    }

    fn source(&self, source: Source) -> Option<&Value> {
        match source {
            Source::Root => Some(self.root),
            Source::Binding(binding) => self.slot(binding),
        }
    }

    fn handle(&self, out: OutRef) -> usize {
        match out {
            OutRef::Root => 0,
            OutRef::Container(out) => self.out_handles[out.0 as usize],
        }
    }

    fn field(&self, key: &'p Key) -> Field<'p> {
        match key {
            Key::Name(name) => Field::Name(name),
            Key::Index(index) => Field::Index(self.indices[index.0 as usize]),
        }
    }
}

/// Write `value` into an output container. Object containers are keyed by
/// name, array containers by index; holes left in arrays are padded with null.
fn insert(container: &mut Value, key: Field<'_>, value: Value) {
    match (container, key) {
        (Value::Object(map), Field::Name(name)) => {
            map.insert(name.to_string(), value);
        }
        (Value::Array(items), Field::Index(index)) => {
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            items[index] = value;
        }
        // The compiler never pairs a container with the other key kind.
        _ => {}
    }
}

impl Program {
    /// Validate `input`, reporting failures to `reporter`.
    ///
    /// Returns the sanitized output when the reporter finishes without
    /// failures.
    pub fn run(
        &self,
        input: &Value,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Value, ExecutionError> {
        VM::new(self, input, reporter).run()
    }

    /// Like [`Program::run`], awaiting async rules.
    pub async fn run_async(
        &self,
        input: &Value,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Value, ExecutionError> {
        VM::new(self, input, reporter).run_async().await
    }
}
