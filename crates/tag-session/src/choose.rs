use tracing::{debug, debug_span};

use tag_core::substitute;

use super::resolver::EntityResolver;
use super::types::{ChooseOutcome, SessionError, SessionState};
use super::AutocompleteSession;

impl AutocompleteSession {
    /// Commit the candidate with `value` for the token under the caret.
    ///
    /// The span is re-derived from the current document and selection. On
    /// success the session adopts the new snapshot and caret and goes Idle;
    /// on error nothing changes.
    pub fn choose(
        &mut self,
        value: &str,
        resolver: &dyn EntityResolver,
    ) -> Result<ChooseOutcome, SessionError> {
        let _span = debug_span!("choose", value).entered();

        if !self.is_active() {
            return Err(SessionError::NoActiveToken);
        }
        let span = self.derive_span().ok_or(SessionError::NoActiveToken)?;
        let candidate = self
            .candidates
            .iter()
            .find(|c| c.value == value)
            .ok_or_else(|| SessionError::UnknownCandidate(value.to_string()))?;
        let resolved = resolver
            .resolve(candidate, self.config.trigger)
            .ok_or_else(|| SessionError::Unresolved(value.to_string()))?;

        let sub = substitute(&self.document, &span, resolved.data, &resolved.display_text)?;
        debug!(entity = %sub.entity, caret = sub.selection.focus, "chosen");

        self.document = sub.document.clone();
        self.selection = sub.selection.clone();
        self.state = SessionState::Idle;
        self.dismissed = None;
        self.inserted.push(sub.entity);

        Ok(ChooseOutcome {
            document: sub.document,
            selection: sub.selection,
            entity: sub.entity,
        })
    }

    /// Commit the highlighted candidate.
    pub fn choose_selected(
        &mut self,
        resolver: &dyn EntityResolver,
    ) -> Result<ChooseOutcome, SessionError> {
        let value = self
            .selected_value()
            .map(str::to_string)
            .ok_or(SessionError::NoActiveToken)?;
        self.choose(&value, resolver)
    }
}
