/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and effects.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(dead_code)]
pub enum StepEvent {
    Jumped,
    /// A genuine landing (not the per-frame floor re-contact of a
    /// grounded hero).
    Landed,
    /// Horizontal sweep stopped against a wall at real speed.
    WallBumped,
    /// Rising sweep stopped against a ceiling.
    CeilingBumped,
    /// The slope-climb rule lifted the hero over a step.
    StepClimbed,
}
