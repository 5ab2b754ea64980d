//! Render-session state: naming stack, paste stack, side flag, metadata.
//!
//! All of this state lives on a [`Session`] threaded through the traversal,
//! never in globals, so independent renders cannot interfere. All pushes are
//! paired with pops through [`ScopeToken`]s:
//! [`Session::enter`] hands one out per node, [`Session::exit`] consumes it,
//! and the traversal runs the exit even when a subtree fails, so the stacks
//! are restored exactly before a render pass returns.

use glam::DVec2;

use crate::errors::RenderError;
use crate::node::{Kind, Name, Scope};
use crate::render::Renderer;

/// One entry of the naming stack.
#[derive(Debug)]
struct NameScope {
    name: Option<Name>,
    /// For an anonymous scope: the designator derived (once) from the next
    /// outer named scope, shared by every pad in this scope.
    cached: Option<String>,
}

/// Metadata accumulated during one render pass. Each field may be set at
/// most once; a second write aborts the render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    /// Element origin mark, in world space.
    pub mark: Option<DVec2>,
    /// Reference-text placement.
    pub text: Option<TextMeta>,
}

/// Placement of the element's reference text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMeta {
    /// Anchor point, in world space.
    pub anchor: DVec2,
    /// Direction quadrant, 0-3.
    pub direction: u8,
    /// Text scale factor.
    pub scale: f64,
}

impl Meta {
    pub(crate) fn set_mark(&mut self, p: DVec2) -> Result<(), RenderError> {
        if self.mark.is_some() {
            return Err(RenderError::DuplicateMetadata { kind: "mark" });
        }
        self.mark = Some(p);
        Ok(())
    }

    pub(crate) fn set_text(&mut self, text: TextMeta) -> Result<(), RenderError> {
        if self.text.is_some() {
            return Err(RenderError::DuplicateMetadata { kind: "text" });
        }
        self.text = Some(text);
        Ok(())
    }
}

/// Receipt for a [`Session::enter`], consumed by [`Session::exit`].
#[must_use]
pub(crate) enum ScopeToken {
    None,
    Name,
    Paste,
    Back,
}

/// Mutable context for one render pass.
#[derive(Debug, Default)]
pub struct Session {
    names: Vec<NameScope>,
    paste: Vec<bool>,
    back: bool,
    pub(crate) meta: Meta,
}

impl Session {
    pub(crate) fn new() -> Session {
        Session::default()
    }

    pub(crate) fn into_meta(self) -> Meta {
        self.meta
    }

    /// Apply a node's entry effect, returning the token that undoes it.
    pub(crate) fn enter(&mut self, kind: &Kind) -> ScopeToken {
        match kind {
            Kind::Group(scope) => self.enter_scope(scope),
            Kind::Render(Renderer::Pad(pad)) => self.enter_scope(&pad.scope),
            Kind::Render(Renderer::Pin(pin)) => self.enter_scope(&pin.scope),
            Kind::Paste(has) => {
                self.paste.push(*has);
                ScopeToken::Paste
            }
            Kind::Back => {
                self.back = !self.back;
                ScopeToken::Back
            }
            _ => ScopeToken::None,
        }
    }

    /// Undo the matching [`Session::enter`].
    pub(crate) fn exit(&mut self, token: ScopeToken) {
        match token {
            ScopeToken::None => {}
            ScopeToken::Name => {
                self.names.pop();
            }
            ScopeToken::Paste => {
                self.paste.pop();
            }
            ScopeToken::Back => self.back = !self.back,
        }
    }

    /// A scope joins the naming stack if it carries its own name, or if the
    /// current top scope is named: that second case is what lets an
    /// anonymous group (or pad) derive and hold a designator of its own.
    /// An anonymous scope entered over an anonymous top stays off the stack,
    /// so arbitrarily deep anonymous nesting still shares one designator.
    fn enter_scope(&mut self, scope: &Scope) -> ScopeToken {
        let top_named = self.names.last().is_some_and(|s| s.name.is_some());
        if scope.name.is_some() || top_named {
            self.names.push(NameScope {
                name: scope.name.clone(),
                cached: None,
            });
            ScopeToken::Name
        } else {
            ScopeToken::None
        }
    }

    /// Resolve the designator for the innermost naming scope.
    ///
    /// A named scope advances its own name on every call; an anonymous scope
    /// derives one designator from the next outer scope on first call and
    /// returns that cached value thereafter.
    pub(crate) fn resolve_name(&mut self) -> Result<String, RenderError> {
        let top = self
            .names
            .len()
            .checked_sub(1)
            .ok_or(RenderError::NoNameScope)?;
        if let Some(name) = &self.names[top].name {
            return Ok(name.advance());
        }
        if let Some(cached) = &self.names[top].cached {
            return Ok(cached.clone());
        }
        let outer = top
            .checked_sub(1)
            .and_then(|i| self.names[i].name.as_ref())
            .ok_or(RenderError::NoNameScope)?;
        let derived = outer.advance();
        self.names[top].cached = Some(derived.clone());
        Ok(derived)
    }

    /// Whether the mirrored-side flag is active.
    pub(crate) fn back(&self) -> bool {
        self.back
    }

    /// Whether the current paste context applies solder paste. True when no
    /// paste node is in scope.
    pub(crate) fn has_paste(&self) -> bool {
        self.paste.last().copied().unwrap_or(true)
    }

    // Direct stack access for the synthesized square-ring pass of a square
    // pin, which renders outside the tree structure.

    pub(crate) fn push_label_scope(&mut self, name: String) {
        self.names.push(NameScope {
            name: Some(Name::Label(name)),
            cached: None,
        });
    }

    pub(crate) fn pop_name_scope(&mut self) {
        self.names.pop();
    }

    pub(crate) fn push_paste(&mut self, has: bool) {
        self.paste.push(has);
    }

    pub(crate) fn pop_paste(&mut self) {
        self.paste.pop();
    }

    pub(crate) fn toggle_back(&mut self) {
        self.back = !self.back;
    }
}
