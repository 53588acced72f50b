use swc_common::DUMMY_SP;
use swc_ecma_ast::*;

/// A value bound to one template placeholder.
///
/// Scalars fill single-node slots; sequences are spliced into list slots
/// (arguments, statements, parameters, properties, class members).
#[derive(Debug, Clone, PartialEq)]
pub enum Subst {
    Expr(Box<Expr>),
    Ident(Ident),
    Str(Str),
    Pat(Pat),
    Stmt(Stmt),
    Prop(PropOrSpread),
    Member(ClassMember),
    Exprs(Vec<Box<Expr>>),
    Stmts(Vec<Stmt>),
    Params(Vec<Param>),
    Props(Vec<PropOrSpread>),
    Members(Vec<ClassMember>),
}

impl Subst {
    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            Subst::Exprs(_) | Subst::Stmts(_) | Subst::Params(_) | Subst::Props(_) | Subst::Members(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Subst::Expr(_) => "an expression",
            Subst::Ident(_) => "an identifier",
            Subst::Str(_) => "a string literal",
            Subst::Pat(_) => "a pattern",
            Subst::Stmt(_) => "a statement",
            Subst::Prop(_) => "a property",
            Subst::Member(_) => "a class member",
            Subst::Exprs(_) => "an expression list",
            Subst::Stmts(_) => "a statement list",
            Subst::Params(_) => "a parameter list",
            Subst::Props(_) => "a property list",
            Subst::Members(_) => "a class member list",
        }
    }

    pub(crate) fn into_expr(self) -> Result<Box<Expr>, &'static str> {
        match self {
            Subst::Expr(e) => Ok(e),
            Subst::Ident(i) => Ok(Box::new(Expr::Ident(i))),
            Subst::Str(s) => Ok(Box::new(Expr::Lit(Lit::Str(s)))),
            other => Err(other.kind()),
        }
    }

    pub(crate) fn into_ident(self) -> Result<Ident, &'static str> {
        match self {
            Subst::Ident(i) => Ok(i),
            Subst::Expr(e) => match *e {
                Expr::Ident(i) => Ok(i),
                _ => Err("an expression"),
            },
            Subst::Pat(Pat::Ident(b)) => Ok(b.id),
            other => Err(other.kind()),
        }
    }

    pub(crate) fn into_pat(self) -> Result<Pat, &'static str> {
        match self {
            Subst::Pat(p) => Ok(p),
            other => other.into_ident().map(|i| Pat::Ident(i.into())),
        }
    }

    pub(crate) fn into_prop_name(self) -> Result<PropName, &'static str> {
        match self {
            Subst::Ident(i) => Ok(PropName::Ident(IdentName::new(i.sym, DUMMY_SP))),
            Subst::Str(s) => Ok(PropName::Str(s)),
            Subst::Expr(e) => Ok(match *e {
                Expr::Lit(Lit::Str(s)) => PropName::Str(s),
                Expr::Lit(Lit::Num(n)) => PropName::Num(n),
                other => PropName::Computed(ComputedPropName {
                    span: DUMMY_SP,
                    expr: Box::new(other),
                }),
            }),
            other => Err(other.kind()),
        }
    }

    pub(crate) fn into_member_prop(self) -> Result<MemberProp, &'static str> {
        match self {
            Subst::Ident(i) => Ok(MemberProp::Ident(IdentName::new(i.sym, DUMMY_SP))),
            other => other.into_expr().map(|expr| {
                MemberProp::Computed(ComputedPropName {
                    span: DUMMY_SP,
                    expr,
                })
            }),
        }
    }
}

impl From<Box<Expr>> for Subst {
    fn from(e: Box<Expr>) -> Self {
        Subst::Expr(e)
    }
}

impl From<Expr> for Subst {
    fn from(e: Expr) -> Self {
        Subst::Expr(Box::new(e))
    }
}

impl From<Ident> for Subst {
    fn from(i: Ident) -> Self {
        Subst::Ident(i)
    }
}

impl From<Str> for Subst {
    fn from(s: Str) -> Self {
        Subst::Str(s)
    }
}

impl From<Pat> for Subst {
    fn from(p: Pat) -> Self {
        Subst::Pat(p)
    }
}

impl From<Stmt> for Subst {
    fn from(s: Stmt) -> Self {
        Subst::Stmt(s)
    }
}

impl From<PropOrSpread> for Subst {
    fn from(p: PropOrSpread) -> Self {
        Subst::Prop(p)
    }
}

impl From<ClassMember> for Subst {
    fn from(m: ClassMember) -> Self {
        Subst::Member(m)
    }
}

impl From<Vec<Box<Expr>>> for Subst {
    fn from(v: Vec<Box<Expr>>) -> Self {
        Subst::Exprs(v)
    }
}

impl From<Vec<Stmt>> for Subst {
    fn from(v: Vec<Stmt>) -> Self {
        Subst::Stmts(v)
    }
}

impl From<Vec<Param>> for Subst {
    fn from(v: Vec<Param>) -> Self {
        Subst::Params(v)
    }
}

impl From<Vec<PropOrSpread>> for Subst {
    fn from(v: Vec<PropOrSpread>) -> Self {
        Subst::Props(v)
    }
}

impl From<Vec<ClassMember>> for Subst {
    fn from(v: Vec<ClassMember>) -> Self {
        Subst::Members(v)
    }
}
