//! Directory context threaded through sub-project resolution.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// Where the entry being resolved lives and where its outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Description files currently being resolved, outermost first.
    stack: Vec<PathBuf>,
}

impl ResolveContext {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            stack: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether `file` is already being resolved further up.
    pub fn is_active(&self, file: &Path) -> bool {
        self.stack.iter().any(|f| f == file)
    }

    /// Enters the directory of `file`. The previous directories are
    /// restored when the returned scope is dropped, on every exit path.
    pub fn enter(&mut self, file: &Path, output_subdir: &Path) -> DirScope<'_> {
        let saved_source = self.source_dir.clone();
        let saved_output = self.output_dir.clone();

        if let Some(parent) = file.parent() {
            self.source_dir = parent.to_path_buf();
        }
        if !output_subdir.as_os_str().is_empty() {
            self.output_dir = self.output_dir.join(output_subdir);
        }
        self.stack.push(file.to_path_buf());

        DirScope {
            ctx: self,
            saved_source,
            saved_output,
        }
    }
}

pub struct DirScope<'a> {
    ctx: &'a mut ResolveContext,
    saved_source: PathBuf,
    saved_output: PathBuf,
}

impl Drop for DirScope<'_> {
    fn drop(&mut self) {
        self.ctx.stack.pop();
        self.ctx.source_dir = std::mem::take(&mut self.saved_source);
        self.ctx.output_dir = std::mem::take(&mut self.saved_output);
    }
}

impl Deref for DirScope<'_> {
    type Target = ResolveContext;

    fn deref(&self) -> &ResolveContext {
        self.ctx
    }
}

impl DerefMut for DirScope<'_> {
    fn deref_mut(&mut self) -> &mut ResolveContext {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_early_return(ctx: &mut ResolveContext) -> Option<()> {
        let mut scope = ctx.enter(Path::new("/src/a/vcgen.toml"), Path::new("a"));
        let inner = scope.enter(Path::new("/src/a/b/vcgen.toml"), Path::new("b"));
        assert_eq!(inner.output_dir, PathBuf::from("/out/a/b"));
        None::<()>?;
        Some(())
    }

    #[test]
    fn test_scope_restores_on_every_path() {
        let mut ctx = ResolveContext::new("/src", "/out");
        {
            let scope = ctx.enter(Path::new("/src/a/vcgen.toml"), Path::new("a"));
            assert_eq!(scope.source_dir, PathBuf::from("/src/a"));
            assert_eq!(scope.output_dir, PathBuf::from("/out/a"));
            assert!(scope.is_active(Path::new("/src/a/vcgen.toml")));
            assert_eq!(scope.depth(), 1);
        }
        assert_eq!(ctx, ResolveContext::new("/src", "/out"));

        assert!(nested_early_return(&mut ctx).is_none());
        assert_eq!(ctx, ResolveContext::new("/src", "/out"));
    }
}
