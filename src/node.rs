use crate::id_table::IdentId;
use crate::util::{Annot, Loc};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    SelfValue,
    Nil,
    Integer(i64),
    Bool(bool),
    String(String),

    Ident(IdentId),
    InstanceVar(IdentId),
    Const(IdentId),

    BinOp(BinOp, Box<Node>, Box<Node>),
    Assign(Box<Node>, Box<Node>),

    CompStmt(NodeVec),
    If {
        cond: Box<Node>,
        then_: Box<Node>,
        else_: Box<Node>,
    },
    Return(Box<Node>),
    Raise(Box<Node>),

    MethodDef(IdentId, Vec<IdentId>, Box<Node>), // id, params, body
    ClassMethodDef(IdentId, Vec<IdentId>, Box<Node>), // id, params, body
    ClassDef {
        id: IdentId,
        superclass: Option<Box<Node>>,
        body: Box<Node>,
    },
    Send {
        receiver: Option<Box<Node>>,
        method: IdentId,
        args: NodeVec,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Eq,
    Ne,
    Gt,
    Lt,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
        }
    }
}

pub type Node = Annot<NodeKind>;
pub type NodeVec = Vec<Node>;

impl Node {
    pub fn new_nil(loc: Loc) -> Self {
        Node::new(NodeKind::Nil, loc)
    }

    pub fn new_self(loc: Loc) -> Self {
        Node::new(NodeKind::SelfValue, loc)
    }

    pub fn new_integer(num: i64, loc: Loc) -> Self {
        Node::new(NodeKind::Integer(num), loc)
    }

    pub fn new_bool(b: bool, loc: Loc) -> Self {
        Node::new(NodeKind::Bool(b), loc)
    }

    pub fn new_string(s: impl Into<String>, loc: Loc) -> Self {
        Node::new(NodeKind::String(s.into()), loc)
    }

    pub fn new_identifier(id: IdentId, loc: Loc) -> Self {
        Node::new(NodeKind::Ident(id), loc)
    }

    pub fn new_instance_var(id: IdentId, loc: Loc) -> Self {
        Node::new(NodeKind::InstanceVar(id), loc)
    }

    pub fn new_const(id: IdentId, loc: Loc) -> Self {
        Node::new(NodeKind::Const(id), loc)
    }

    pub fn new_binop(op: BinOp, lhs: Node, rhs: Node) -> Self {
        let loc = lhs.loc().merge(rhs.loc());
        Node::new(NodeKind::BinOp(op, Box::new(lhs), Box::new(rhs)), loc)
    }

    pub fn new_assign(lhs: Node, rhs: Node) -> Self {
        let loc = lhs.loc().merge(rhs.loc());
        Node::new(NodeKind::Assign(Box::new(lhs), Box::new(rhs)), loc)
    }

    pub fn new_comp_stmt(nodes: NodeVec, mut loc: Loc) -> Self {
        if let Some(node) = nodes.first() {
            loc = node.loc();
        };
        if let Some(node) = nodes.last() {
            loc = loc.merge(node.loc());
        };
        Node::new(NodeKind::CompStmt(nodes), loc)
    }

    pub fn new_if(cond: Node, then_: Node, else_: Node, loc: Loc) -> Self {
        let loc = loc.merge(cond.loc());
        Node::new(
            NodeKind::If {
                cond: Box::new(cond),
                then_: Box::new(then_),
                else_: Box::new(else_),
            },
            loc,
        )
    }

    pub fn new_return(val: Node, loc: Loc) -> Self {
        let loc = loc.merge(val.loc());
        Node::new(NodeKind::Return(Box::new(val)), loc)
    }

    pub fn new_raise(message: Node, loc: Loc) -> Self {
        let loc = loc.merge(message.loc());
        Node::new(NodeKind::Raise(Box::new(message)), loc)
    }

    pub fn new_method_decl(id: IdentId, params: Vec<IdentId>, body: Node, loc: Loc) -> Self {
        let loc = loc.merge(body.loc());
        Node::new(NodeKind::MethodDef(id, params, Box::new(body)), loc)
    }

    pub fn new_class_method_decl(
        id: IdentId,
        params: Vec<IdentId>,
        body: Node,
        loc: Loc,
    ) -> Self {
        let loc = loc.merge(body.loc());
        Node::new(NodeKind::ClassMethodDef(id, params, Box::new(body)), loc)
    }

    pub fn new_class_decl(id: IdentId, superclass: Option<Node>, body: Node, loc: Loc) -> Self {
        let loc = loc.merge(body.loc());
        Node::new(
            NodeKind::ClassDef {
                id,
                superclass: superclass.map(Box::new),
                body: Box::new(body),
            },
            loc,
        )
    }

    pub fn new_send(receiver: Option<Node>, method: IdentId, args: NodeVec, loc: Loc) -> Self {
        let loc = match args.last() {
            Some(arg) => loc.merge(arg.loc()),
            None => loc,
        };
        Node::new(
            NodeKind::Send {
                receiver: receiver.map(Box::new),
                method,
                args,
            },
            loc,
        )
    }
}

fn join(f: &mut fmt::Formatter<'_>, nodes: &[Node], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i != 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

fn join_ids(ids: &[IdentId]) -> String {
    ids.iter()
        .map(|id| IdentId::get_name(*id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Source-like rendering, used for inspecting method bodies.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::SelfValue => write!(f, "self"),
            NodeKind::Nil => write!(f, "nil"),
            NodeKind::Integer(i) => write!(f, "{}", i),
            NodeKind::Bool(b) => write!(f, "{}", b),
            NodeKind::String(s) => write!(f, "{:?}", s),
            NodeKind::Ident(id) | NodeKind::Const(id) => write!(f, "{:?}", id),
            NodeKind::InstanceVar(id) => write!(f, "@{:?}", id),
            NodeKind::BinOp(op, lhs, rhs) => write!(f, "{} {} {}", lhs, op.as_str(), rhs),
            NodeKind::Assign(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
            NodeKind::CompStmt(nodes) => join(f, nodes, "\n"),
            NodeKind::If { cond, then_, else_ } => {
                write!(f, "if {}\n{}\nelse\n{}\nend", cond, then_, else_)
            }
            NodeKind::Return(val) => write!(f, "return {}", val),
            NodeKind::Raise(msg) => write!(f, "raise {}", msg),
            NodeKind::MethodDef(id, params, body) => {
                write!(f, "def {:?}({})\n{}\nend", id, join_ids(params), body)
            }
            NodeKind::ClassMethodDef(id, params, body) => {
                write!(f, "def self.{:?}({})\n{}\nend", id, join_ids(params), body)
            }
            NodeKind::ClassDef {
                id,
                superclass,
                body,
            } => {
                write!(f, "class {:?}", id)?;
                if let Some(superclass) = superclass {
                    write!(f, " < {}", superclass)?;
                }
                write!(f, "\n{}\nend", body)
            }
            NodeKind::Send {
                receiver,
                method,
                args,
            } => {
                if let Some(receiver) = receiver {
                    write!(f, "{}.", receiver)?;
                }
                write!(f, "{:?}(", method)?;
                join(f, args, ", ")?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_body() {
        let loc = Loc(0, 0);
        let x = IdentId::get_id("x");
        let body = Node::new_comp_stmt(
            vec![
                Node::new_return(
                    Node::new_binop(
                        BinOp::Add,
                        Node::new_identifier(x, loc),
                        Node::new_integer(1, loc),
                    ),
                    loc,
                ),
                Node::new_string("unreached", loc),
            ],
            loc,
        );
        assert_eq!("return x + 1\n\"unreached\"", body.to_string());
    }

    #[test]
    fn render_send() {
        let loc = Loc(0, 0);
        let node = Node::new_send(
            Some(Node::new_const(IdentId::get_id("Foo"), loc)),
            IdentId::NEW,
            vec![Node::new_integer(3, loc), Node::new_nil(loc)],
            loc,
        );
        assert_eq!("Foo.new(3, nil)", node.to_string());
    }
}
