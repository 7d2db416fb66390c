//! Lexical scope for resolution.
//!
//! A `Scope` maps identifiers to the unresolved expression each one is bound
//! to, plus the file the expression being resolved came from. Scopes are
//! immutable: `extend` and `switch_file` return a new scope that shares its
//! parent's frames through `Rc`, so a sibling branch of the tree never sees
//! bindings introduced in another.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use jcat_ir::{Bind, Expr, Name};
use rustc_hash::FxHashMap;

/// Bindings introduced by one `local` or object literal.
struct Frame<'a> {
    /// Identifier to bound expression (`FxHashMap` for cheap `Name` hashing).
    bindings: FxHashMap<Name, &'a Expr>,
    /// Enclosing frame, searched when a name is not bound here.
    parent: Option<Rc<Frame<'a>>>,
}

/// A file on the import chain, innermost first.
struct ImportLink {
    path: PathBuf,
    parent: Option<Rc<ImportLink>>,
}

/// Immutable lexical scope.
#[derive(Clone)]
pub struct Scope<'a> {
    frame: Option<Rc<Frame<'a>>>,
    imports: Rc<ImportLink>,
}

impl<'a> Scope<'a> {
    /// Empty scope for resolving the root expression of `file`.
    pub fn root(file: impl Into<PathBuf>) -> Self {
        Scope {
            frame: None,
            imports: Rc::new(ImportLink {
                path: file.into(),
                parent: None,
            }),
        }
    }

    /// The file the expression being resolved belongs to.
    #[inline]
    pub fn file(&self) -> &Path {
        &self.imports.path
    }

    /// New scope with `binds` layered over this one.
    ///
    /// Names in `binds` shadow outer bindings; a name repeated within
    /// `binds` keeps its last binding.
    #[must_use]
    pub fn extend(&self, binds: &'a [Bind]) -> Self {
        self.extend_with(binds.iter().map(|bind| (bind.name, &bind.body)))
    }

    /// New scope with the given name/expression pairs layered over this one.
    #[must_use]
    pub fn extend_with(&self, binds: impl IntoIterator<Item = (Name, &'a Expr)>) -> Self {
        let bindings: FxHashMap<Name, &'a Expr> = binds.into_iter().collect();
        if bindings.is_empty() {
            return self.clone();
        }
        Scope {
            frame: Some(Rc::new(Frame {
                bindings,
                parent: self.frame.clone(),
            })),
            imports: Rc::clone(&self.imports),
        }
    }

    /// Copy of this scope whose current file is `file`.
    ///
    /// Bindings are kept. The new file is pushed onto the import chain.
    #[must_use]
    pub fn switch_file(&self, file: impl Into<PathBuf>) -> Self {
        Scope {
            frame: self.frame.clone(),
            imports: Rc::new(ImportLink {
                path: file.into(),
                parent: Some(Rc::clone(&self.imports)),
            }),
        }
    }

    /// Look up the expression bound to `name`, innermost binding first.
    pub fn lookup(&self, name: Name) -> Option<&'a Expr> {
        let mut frame = self.frame.as_deref();
        while let Some(current) = frame {
            if let Some(&expr) = current.bindings.get(&name) {
                return Some(expr);
            }
            frame = current.parent.as_deref();
        }
        None
    }

    /// Whether `file` is already being resolved further up the import chain.
    pub fn is_importing(&self, file: &Path) -> bool {
        self.import_chain().any(|path| path == file)
    }

    /// Files on the import chain, current file first.
    pub fn import_chain(&self) -> impl Iterator<Item = &Path> + '_ {
        let mut link = Some(&*self.imports);
        std::iter::from_fn(move || {
            let current = link?;
            link = current.parent.as_deref();
            Some(current.path.as_path())
        })
    }

    /// Number of binding frames between this scope and the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.frame.as_deref();
        while let Some(current) = frame {
            depth += 1;
            frame = current.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("file", &self.file())
            .field("frames", &self.depth())
            .finish_non_exhaustive()
    }
}
