//! Human-readable program dump for debugging.
//!
//! ```text
//! [program]
//! marks = 1
//! ...
//!
//! [nodes]
//!   0000  open capture #1 end=0048
//!   0024  lit "ab"
//! ```

use std::fmt::Write as _;

use rebound_core::Colors;

use crate::flags::GroupKind;
use crate::node::{INFINITE, NO_SCOPE, Node};
use crate::program::Program;

pub fn dump(program: &Program, colors: Colors) -> String {
    let mut out = String::new();
    dump_header(&mut out, program, colors);
    dump_names(&mut out, program, colors);
    dump_nodes(&mut out, program, colors);
    out
}

fn dump_header(out: &mut String, program: &Program, c: Colors) {
    writeln!(out, "{}[program]{}", c.blue, c.reset).unwrap();
    writeln!(out, "pattern = {:?}", program.pattern()).unwrap();
    writeln!(out, "marks = {}", program.mark_count()).unwrap();
    writeln!(out, "restart = {:?}", program.restart()).unwrap();
    if let Some(prefix) = program.literal_prefix() {
        writeln!(out, "prefix = {prefix:?}").unwrap();
    }
    writeln!(out, "nullable = {}", program.can_be_null()).unwrap();
    writeln!(out, "recursion = {}", program.has_recursion()).unwrap();
    out.push('\n');
}

fn dump_names(out: &mut String, program: &Program, c: Colors) {
    if program.names().is_empty() {
        return;
    }
    writeln!(out, "{}[names]{}", c.blue, c.reset).unwrap();
    for (name, indices) in program.names().iter() {
        let indices: Vec<_> = indices.iter().map(|i| format!("#{i}")).collect();
        writeln!(out, "{}{name}{} = {}", c.blue, c.reset, indices.join(", ")).unwrap();
    }
    out.push('\n');
}

fn dump_nodes(out: &mut String, program: &Program, c: Colors) {
    writeln!(out, "{}[nodes]{}", c.blue, c.reset).unwrap();
    for (at, node) in program.nodes() {
        writeln!(out, "  {}{at:04}{}  {}", c.dim, c.reset, format_node(&node, c)).unwrap();
    }
}

fn group_kind(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Capture => "capture",
        GroupKind::NonCapture => "group",
        GroupKind::Atomic => "atomic",
        GroupKind::LookAhead => "ahead",
        GroupKind::NegLookAhead => "!ahead",
        GroupKind::LookBehind => "behind",
        GroupKind::NegLookBehind => "!behind",
    }
}

fn icase_suffix(icase: bool) -> &'static str {
    if icase { " /i" } else { "" }
}

/// One-line rendering of a node, shared with the print tracer.
pub fn format_node(node: &Node<'_>, c: Colors) -> String {
    match node {
        Node::StartMark {
            kind,
            index,
            end,
            cond_no,
        } => {
            let mut s = format!(
                "{}open{} {} #{index} end={end:04}",
                c.blue,
                c.reset,
                group_kind(*kind)
            );
            if let Some(no) = cond_no {
                write!(s, " no={no:04}").unwrap();
            }
            s
        }
        Node::EndMark { kind, index } => {
            format!("{}close{} {} #{index}", c.blue, c.reset, group_kind(*kind))
        }
        Node::Literal { text, icase } => {
            format!("lit {}{text:?}{}{}", c.green, c.reset, icase_suffix(*icase))
        }
        Node::StartLine { single_line } => {
            format!("bol{}", if *single_line { " single" } else { "" })
        }
        Node::EndLine { single_line } => {
            format!("eol{}", if *single_line { " single" } else { "" })
        }
        Node::Wild { mode } => format!("any {mode:?}"),
        Node::Match => format!("{}match{}", c.green, c.reset),
        Node::WordBoundary => "\\b".to_owned(),
        Node::NotWordBoundary => "\\B".to_owned(),
        Node::WordStart => "\\<".to_owned(),
        Node::WordEnd => "\\>".to_owned(),
        Node::BufferStart => "\\A".to_owned(),
        Node::BufferEnd => "\\z".to_owned(),
        Node::SoftBufferEnd => "\\Z".to_owned(),
        Node::ContinueMatch => "\\G".to_owned(),
        Node::Combining => "\\X".to_owned(),
        Node::Backref { value, named } => {
            if *named {
                format!("backref <{value:08x}>")
            } else {
                format!("backref #{value}")
            }
        }
        Node::Set {
            map,
            negated,
            icase,
        } => format!(
            "set {}[{}]{}",
            if *negated { "^" } else { "" },
            map.to_char_map().count(),
            icase_suffix(*icase)
        ),
        Node::LongSet(set) => format!(
            "wide-set {}[{} singles, {} ranges, {} equivs, {:?}]{}",
            if set.negated { "^" } else { "" },
            set.singles().count(),
            set.ranges().count(),
            set.equivs().count(),
            set.class() | set.not_class(),
            icase_suffix(set.icase)
        ),
        Node::Jump { target } => format!("{}jump{} {target:04}", c.dim, c.reset),
        Node::Alt {
            alt,
            take_null,
            skip_null,
            ..
        } => format!(
            "alt {alt:04}{}{}",
            if *take_null { " take-null" } else { "" },
            if *skip_null { " skip-null" } else { "" }
        ),
        Node::Repeat(r) => {
            let max = if r.max == INFINITE {
                "inf".to_owned()
            } else {
                r.max.to_string()
            };
            format!(
                "repeat r{} {{{},{max}}} {} exit={:04}{}",
                r.id,
                r.min,
                if r.greedy { "greedy" } else { "lazy" },
                r.alt,
                if r.leading { " leading" } else { "" }
            )
        }
        Node::Backstep { width } => format!("backstep {width}"),
        Node::CaseToggle { icase } => format!("icase {}", if *icase { "on" } else { "off" }),
        Node::Recurse { group, target } => format!("recurse #{group} -> {target:04}"),
        Node::Conditional { kind, value, alt } => {
            format!("cond {kind:?} {value} no={alt:04}")
        }
        Node::Prune => "(*PRUNE)".to_owned(),
        Node::Skip => "(*SKIP)".to_owned(),
        Node::Commit => "(*COMMIT)".to_owned(),
        Node::Then { scope } => {
            if *scope == NO_SCOPE {
                "(*THEN)".to_owned()
            } else {
                format!("(*THEN) scope={scope}")
            }
        }
        Node::Fail => format!("{}(*FAIL){}", c.red, c.reset),
        Node::Accept => "(*ACCEPT)".to_owned(),
    }
}
