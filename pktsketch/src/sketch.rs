//! Sketch specification generation.
//!
//! A packet function body is a straight-line sequence of assignments. The generator turns
//! it into a self-contained function for the synthesizer:
//!
//! - packet fields read but never assigned become parameters `pkt_1, pkt_2, ...`
//! - packet fields assigned in the body become locals, `p.x` turning into `p_x`
//! - state scalars and arrays become parameters `state_1, state_2, ...`
//!
//! Numbering follows ascending canonical names, so identical input always produces
//! identical text. State parameters precede packet parameters in the signature.
use std::collections::BTreeSet;

use log::{debug, info, trace};
use pktir::{
    ast::{Node, TranslationUnit},
    fmt::print_node,
    packet::PacketFunctionFilter,
    rename::{RenameTable, render_with_renaming},
    vars::{CanonicalName, SynthName, VariableKinds, collect_variables},
};

use crate::{
    collector::collect_state_vars,
    utils::{
        conf::SketchConfig,
        error::{SketchError, SketchResult},
    },
};

/// Generated function text for one packet function.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Specification {
    /// `void spec(int state_1,int pkt_1)`
    pub signature: String,
    /// Brace-delimited assignments, one per line.
    pub body: String,
}

impl std::fmt::Display for Specification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.signature, self.body)
    }
}

/// Data-flow facts and renaming computed for one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchAnalysis {
    /// Every packet field referenced in the body.
    pub all_pkt_fields: BTreeSet<CanonicalName>,
    /// Packet fields assigned by a top-level statement.
    pub defined_fields: BTreeSet<CanonicalName>,
    /// Packet fields read but never assigned: the implicit inputs.
    pub incoming_fields: BTreeSet<CanonicalName>,
    /// State scalars and arrays referenced in the body.
    pub state_refs: BTreeSet<CanonicalName>,
    pub rename_table: RenameTable,
    pub state_params: Vec<SynthName>,
    pub packet_params: Vec<SynthName>,
}

impl SketchAnalysis {
    /// Signature parameters, state first.
    pub fn params(&self) -> impl Iterator<Item = &SynthName> {
        self.state_params.iter().chain(&self.packet_params)
    }
}

/// Left and right operands of every top-level assignment of `body`, in order.
fn top_level_assignments(body: &Node) -> SketchResult<Vec<(&Node, &Node)>> {
    let Node::Compound(stmts) = body else {
        return Err(SketchError::BodyNotCompound { kind: body.kind() });
    };

    stmts
        .iter()
        .map(|stmt| match stmt {
            Node::BinaryOp { op, lhs, rhs } if op.is_assignment() => Ok((&**lhs, &**rhs)),
            Node::BinaryOp { op, .. } if op.is_compound_assignment() => {
                Err(SketchError::NotTrueAssignment { opcode: *op })
            }
            other => Err(SketchError::NonAssignmentStatement {
                statement: print_node(other),
            }),
        })
        .collect()
}

/// Number `names` in order as `prefix1, prefix2, ...`, recording each in `table`.
fn number_names<'a>(
    names: impl IntoIterator<Item = &'a CanonicalName>,
    prefix: &str,
    table: &mut RenameTable,
) -> SketchResult<Vec<SynthName>> {
    let mut params = Vec::new();
    for (i, name) in names.into_iter().enumerate() {
        let synth = SynthName(format!("{}{}", prefix, i + 1));
        trace!("Renaming `{}` to `{}`", name, synth);
        table.insert(name.clone(), synth.clone())?;
        params.push(synth);
    }
    Ok(params)
}

/// Generates sketch specifications for packet functions.
#[derive(Debug, Clone, Default)]
pub struct SketchGenerator {
    config: SketchConfig,
}

impl SketchGenerator {
    pub fn new(config: SketchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Compute field sets, state references and the rename table of `body`.
    pub fn analyze(&self, body: &Node) -> SketchResult<SketchAnalysis> {
        let all_pkt_fields = collect_variables(body, VariableKinds::PACKET_FIELD);

        let mut defined_fields = BTreeSet::new();
        for (lhs, _) in top_level_assignments(body)? {
            if let Node::Member { .. } = lhs {
                defined_fields.insert(CanonicalName(print_node(lhs)));
            }
        }

        let incoming_fields: BTreeSet<CanonicalName> = all_pkt_fields
            .difference(&defined_fields)
            .cloned()
            .collect();

        let mut rename_table = RenameTable::new();
        let packet_params = number_names(
            &incoming_fields,
            &self.config.packet_prefix,
            &mut rename_table,
        )?;

        // p.x is written locally: it keeps its own name, flattened to p_x
        for field in &defined_fields {
            let local = SynthName(field.as_str().replace('.', "_"));
            trace!("Renaming `{}` to `{}`", field, local);
            rename_table.insert(field.clone(), local)?;
        }

        let state_refs = collect_state_vars(body)?;
        let state_params =
            number_names(&state_refs, &self.config.state_prefix, &mut rename_table)?;

        debug!(
            "Packet body analysis: {} packet fields ({} incoming, {} defined), {} state variables",
            all_pkt_fields.len(),
            incoming_fields.len(),
            defined_fields.len(),
            state_refs.len()
        );

        Ok(SketchAnalysis {
            all_pkt_fields,
            defined_fields,
            incoming_fields,
            state_refs,
            rename_table,
            state_params,
            packet_params,
        })
    }

    /// Build the specification of one packet function body.
    pub fn create_sketch_spec(&self, body: &Node) -> SketchResult<Specification> {
        let analysis = self.analyze(body)?;

        let params = analysis
            .params()
            .map(|param| format!("{} {}", self.config.param_type, param))
            .collect::<Vec<_>>()
            .join(",");
        let signature = format!("void {}({})", self.config.spec_name, params);

        let mut spec_body = String::from("{\n");
        for (lhs, rhs) in top_level_assignments(body)? {
            spec_body += &render_with_renaming(lhs, &analysis.rename_table, VariableKinds::ALL)?;
            spec_body += "=";
            spec_body += &render_with_renaming(rhs, &analysis.rename_table, VariableKinds::ALL)?;
            spec_body += ";\n";
        }
        spec_body += "}";

        Ok(Specification {
            signature,
            body: spec_body,
        })
    }

    /// Specifications of every packet function of `unit`, concatenated in declaration
    /// order. Empty when no function matches `filter`.
    pub fn transform<F>(&self, unit: &TranslationUnit, filter: &F) -> SketchResult<String>
    where
        F: PacketFunctionFilter + ?Sized,
    {
        let mut ret = String::new();
        for function in unit.functions() {
            if !filter.is_packet_function(function) {
                continue;
            }

            let body = function
                .body
                .as_ref()
                .ok_or_else(|| SketchError::MissingBody {
                    function: function.name.clone(),
                })?;
            let spec = self.create_sketch_spec(body)?;
            info!("Generated sketch specification for packet function `{}`", function.name);
            ret += &spec.to_string();
        }
        Ok(ret)
    }
}

/// Sketch specifications of `unit` with the default configuration.
pub fn sketch_backend_transform(unit: &TranslationUnit) -> SketchResult<String> {
    let generator = SketchGenerator::default();
    let filter = generator.config().packet_filter();
    generator.transform(unit, &filter)
}
