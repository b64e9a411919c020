use crossterm::event::Event;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    Tick,
    Render,
    Terminal(Event),
}
