//! The resolver: expression tree + scope to catalog value.
//!
//! Resolution is lazy and scope-driven. A variable resolves whatever its
//! binding resolves to under the scope at the *use* site, so nothing is
//! resolved unless a field of the catalog reaches it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use jcat_ir::{Bind, Expr, ExprKind, Field, Name, OpaqueKind, Span, StringInterner};
use jcat_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::locate::locate;
use crate::{CatalogValue, ImportResolver, ResolveError, Scope};

/// Bound to `std` in the root scope when `ResolveConfig::bind_std` is set.
static STD_LIBRARY: Expr = Expr {
    kind: ExprKind::Other(OpaqueKind::Std),
    span: Span::DUMMY,
};

/// Resolver settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Maximum nesting of resolution steps before giving up. Bounds
    /// self-referential bindings such as `local x = x; x`.
    pub max_depth: usize,
    /// Bind `std` in the root scope to an opaque standard-library node.
    pub bind_std: bool,
}

impl ResolveConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 512;
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            bind_std: true,
        }
    }
}

/// Turns expression trees into catalog values.
pub struct Resolver<'r> {
    importer: &'r dyn ImportResolver,
    interner: &'r StringInterner,
    config: ResolveConfig,
}

impl<'r> Resolver<'r> {
    /// `interner` must be the interner the trees (including imported ones)
    /// were parsed with.
    pub fn new(importer: &'r dyn ImportResolver, interner: &'r StringInterner) -> Self {
        Resolver {
            importer,
            interner,
            config: ResolveConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResolveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// Resolve the root expression of `file`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.display()))]
    pub fn resolve_file(&self, root: &Expr, file: &Path) -> Result<CatalogValue, ResolveError> {
        let scope = Scope::root(file);
        let scope = if self.config.bind_std {
            scope.extend_with([(self.interner.intern("std"), &STD_LIBRARY)])
        } else {
            scope
        };
        let catalog = self.resolve(root, &scope)?;
        debug!(signatures = catalog.signature_count(), "resolved");
        Ok(catalog)
    }

    /// Resolve `expr` under `scope`.
    pub fn resolve<'e>(
        &self,
        expr: &'e Expr,
        scope: &Scope<'e>,
    ) -> Result<CatalogValue, ResolveError> {
        self.resolve_at(expr, scope, 0)
    }

    fn resolve_at<'e>(
        &self,
        expr: &'e Expr,
        scope: &Scope<'e>,
        depth: usize,
    ) -> Result<CatalogValue, ResolveError> {
        if depth > self.config.max_depth {
            return Err(ResolveError::depth_exceeded(
                self.config.max_depth,
                scope.file(),
                expr.span,
            ));
        }
        ensure_sufficient_stack(|| self.resolve_kind(expr, scope, depth + 1))
    }

    fn resolve_kind<'e>(
        &self,
        expr: &'e Expr,
        scope: &Scope<'e>,
        depth: usize,
    ) -> Result<CatalogValue, ResolveError> {
        match &expr.kind {
            ExprKind::Local { binds, body } => self.resolve_at(body, &scope.extend(binds), depth),
            ExprKind::Object { fields, locals } => {
                self.resolve_object(fields, locals, scope, depth)
            }
            ExprKind::Function { params } => Ok(CatalogValue::signature(
                params.iter().map(|name| self.interner.lookup(name)),
            )),
            ExprKind::Import { file } => self.resolve_import(file, scope, depth),
            ExprKind::Var(name) => {
                let bound = self.lookup(*name, expr.span, scope)?;
                self.resolve_at(bound, scope, depth)
            }
            ExprKind::Index { target, field } => {
                self.resolve_index(expr, target, *field, scope, depth)
            }
            ExprKind::Other(kind) => Ok(CatalogValue::opaque(kind.tag())),
        }
    }

    fn resolve_object<'e>(
        &self,
        fields: &'e [Field],
        locals: &'e [Bind],
        scope: &Scope<'e>,
        depth: usize,
    ) -> Result<CatalogValue, ResolveError> {
        let inner = scope.extend(locals);
        let mut entries = BTreeMap::new();
        for field in fields {
            let Some(name) = field.name.fixed() else {
                debug!(span = %field.span, "skipping computed field name");
                continue;
            };
            let value = self.resolve_at(&field.body, &inner, depth)?;
            entries
                .entry(self.interner.lookup(name).to_owned())
                .or_insert(value);
        }
        Ok(CatalogValue::Namespace(entries))
    }

    fn resolve_import(
        &self,
        target: &str,
        scope: &Scope<'_>,
        depth: usize,
    ) -> Result<CatalogValue, ResolveError> {
        let imported = self.importer.resolve_import(scope.file(), target)?;
        if scope.is_importing(&imported.path) {
            let mut chain: Vec<PathBuf> = scope.import_chain().map(Path::to_path_buf).collect();
            chain.reverse();
            chain.push(imported.path);
            return Err(ResolveError::ImportCycle { chain });
        }

        debug!(import = target, path = %imported.path.display(), "entering import");
        let inner = scope.switch_file(imported.path.as_path());
        self.resolve_at(&imported.root, &inner, depth)
    }

    fn resolve_index<'e>(
        &self,
        expr: &Expr,
        target: &'e Expr,
        field: Name,
        scope: &Scope<'e>,
        depth: usize,
    ) -> Result<CatalogValue, ResolveError> {
        if let ExprKind::Var(name) = target.kind {
            let bound = self.lookup(name, target.span, scope)?;
            return match locate(bound, field) {
                Some(found) => self.resolve_at(found, scope, depth),
                None => {
                    trace!(
                        field = self.interner.lookup(field),
                        span = %expr.span,
                        "field not located"
                    );
                    Ok(CatalogValue::Absent)
                }
            };
        }

        // `$` is a local bound to the outermost object's `self`, which the
        // locator cannot see into.
        if let ExprKind::Other(OpaqueKind::Dollar) = target.kind {
            trace!(span = %expr.span, "field of `$` not located");
            return Ok(CatalogValue::Absent);
        }

        // Any other target is resolved first and the field projected out of
        // the resulting namespace.
        Ok(match self.resolve_at(target, scope, depth)? {
            CatalogValue::Namespace(mut entries) => entries
                .remove(self.interner.lookup(field))
                .unwrap_or(CatalogValue::Absent),
            CatalogValue::Absent => CatalogValue::Absent,
            CatalogValue::Signature { .. } | CatalogValue::Opaque { .. } => {
                CatalogValue::opaque(expr.tag())
            }
        })
    }

    fn lookup<'e>(
        &self,
        name: Name,
        span: Span,
        scope: &Scope<'e>,
    ) -> Result<&'e Expr, ResolveError> {
        scope.lookup(name).ok_or_else(|| {
            ResolveError::unknown_identifier(self.interner.lookup(name), scope.file(), span)
        })
    }
}
