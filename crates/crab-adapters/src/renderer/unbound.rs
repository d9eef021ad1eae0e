//! Static check for names a template uses but the context does not bind.
//!
//! Tera only fails on an undefined name when it has to print or iterate it.
//! In a condition (`{% if missing %}`) the name silently reads as false. The
//! renderer runs [`first_unbound`] over the parsed template first so every
//! use of an unknown name is rejected, wherever it appears.
//!
//! Names bound inside the template itself count as defined: loop variables,
//! `loop`, `{% set %}` targets and macro arguments. Two explicit escape
//! hatches are honoured as well: `x is defined` / `x is undefined` tests and
//! a leading `default` filter.

use tera::ast::{Expr, ExprVal, FunctionCall, Node};

/// Template-internal name always available inside a `for` body.
const LOOP_VAR: &str = "loop";
/// Magic variable Tera exposes to every template.
const CONTEXT_VAR: &str = "__tera_context";

/// First name used by `nodes` that is neither bound by the template nor
/// accepted by `is_bound`.
pub(crate) fn first_unbound(nodes: &[Node], is_bound: &dyn Fn(&str) -> bool) -> Option<String> {
    let mut walker = Walker {
        is_bound,
        locals: vec![CONTEXT_VAR.to_string()],
        globals: Vec::new(),
    };
    walker.nodes(nodes).err()
}

struct Walker<'a> {
    is_bound: &'a dyn Fn(&str) -> bool,
    locals: Vec<String>,
    /// `{% set_global %}` targets, which outlive the frame they are set in.
    globals: Vec<String>,
}

/// `Err(name)` stops the walk at the first unbound name.
type Walk = Result<(), String>;

impl Walker<'_> {
    fn nodes(&mut self, nodes: &[Node]) -> Walk {
        nodes.iter().try_for_each(|node| self.node(node))
    }

    fn node(&mut self, node: &Node) -> Walk {
        match node {
            Node::VariableBlock(_, expr) => self.expr(expr),
            Node::Set(_, set) => {
                self.expr(&set.value)?;
                if set.global {
                    self.globals.push(set.key.clone());
                } else {
                    self.locals.push(set.key.clone());
                }
                Ok(())
            }
            // `if` opens no frame: a `set` inside stays visible afterwards.
            Node::If(branches, _) => {
                for (_, condition, body) in &branches.conditions {
                    self.expr(condition)?;
                    self.nodes(body)?;
                }
                match &branches.otherwise {
                    Some((_, body)) => self.nodes(body),
                    None => Ok(()),
                }
            }
            Node::Forloop(_, forloop, _) => {
                self.expr(&forloop.container)?;
                let mut bound = vec![forloop.value.clone(), LOOP_VAR.to_string()];
                bound.extend(forloop.key.clone());
                self.scoped(&bound, &forloop.body)?;
                match &forloop.empty_body {
                    Some(body) => self.scoped(&[], body),
                    None => Ok(()),
                }
            }
            Node::FilterSection(_, section, _) => {
                self.call(&section.filter)?;
                self.nodes(&section.body)
            }
            Node::Block(_, block, _) => self.nodes(&block.body),
            Node::MacroDefinition(_, definition, _) => {
                for default in definition.args.values().flatten() {
                    self.expr(default)?;
                }
                let args: Vec<String> = definition.args.keys().cloned().collect();
                self.scoped(&args, &definition.body)
            }
            Node::ImportMacro(_, _, namespace) => {
                self.locals.push(namespace.clone());
                Ok(())
            }
            Node::Super
            | Node::Text(_)
            | Node::Extends(..)
            | Node::Include(..)
            | Node::Raw(..)
            | Node::Break(_)
            | Node::Continue(_)
            | Node::Comment(..) => Ok(()),
        }
    }

    /// Walk `body` in a new frame holding `bound`. A plain `{% set %}` inside
    /// the frame ends with it.
    fn scoped(&mut self, bound: &[String], body: &[Node]) -> Walk {
        let mark = self.locals.len();
        self.locals.extend_from_slice(bound);
        let result = self.nodes(body);
        self.locals.truncate(mark);
        result
    }

    fn expr(&mut self, expr: &Expr) -> Walk {
        for filter in &expr.filters {
            self.call(filter)?;
        }
        if expr.has_default_filter() {
            return Ok(());
        }
        self.value(&expr.val)
    }

    fn value(&mut self, value: &ExprVal) -> Walk {
        match value {
            ExprVal::Ident(ident) => self.ident(ident),
            ExprVal::Math(math) => {
                self.expr(&math.lhs)?;
                self.expr(&math.rhs)
            }
            ExprVal::Logic(logic) => {
                self.expr(&logic.lhs)?;
                self.expr(&logic.rhs)
            }
            ExprVal::In(within) => {
                self.expr(&within.lhs)?;
                self.expr(&within.rhs)
            }
            ExprVal::Test(test) => {
                for arg in &test.args {
                    self.expr(arg)?;
                }
                match test.name.as_str() {
                    "defined" | "undefined" => Ok(()),
                    _ => self.ident(&test.ident),
                }
            }
            ExprVal::FunctionCall(call) => self.call(call),
            ExprVal::MacroCall(call) => call.args.values().try_for_each(|arg| self.expr(arg)),
            ExprVal::Array(items) => items.iter().try_for_each(|item| self.expr(item)),
            ExprVal::StringConcat(concat) => {
                concat.values.iter().try_for_each(|part| self.value(part))
            }
            ExprVal::String(_) | ExprVal::Int(_) | ExprVal::Float(_) | ExprVal::Bool(_) => Ok(()),
        }
    }

    fn call(&mut self, call: &FunctionCall) -> Walk {
        call.args.values().try_for_each(|arg| self.expr(arg))
    }

    fn ident(&self, ident: &str) -> Walk {
        let root = root_name(ident);
        let local = self.locals.iter().chain(&self.globals).any(|name| name == root);
        if local || (self.is_bound)(root) {
            Ok(())
        } else {
            Err(root.to_string())
        }
    }
}

/// `author` for `author`, `user.name` and `items[0]`.
fn root_name(ident: &str) -> &str {
    ident
        .split(['.', '['])
        .next()
        .unwrap_or(ident)
        .trim()
}
