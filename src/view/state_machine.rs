use crate::status::LifecycleStatus;
use serde::Serialize;

/// Icon on the action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionIcon {
    Play,
    Stop,
}

/// Theme color role used to tint the action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TintRole {
    Primary,
    Tertiary,
    Error,
}

/// Text shown next to the action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionLabel {
    Connect,
    Connecting,
    Disconnect,
    Disconnecting,
}

/// Side effects requested by a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Effect {
    CheckNotices,
    EnablePager,
    DisablePager,
}

/// Widget state derived from a lifecycle status.
///
/// `None` in any field means the widget keeps whatever it currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewStateDescriptor {
    pub action_icon: Option<ActionIcon>,
    pub action_tint: Option<TintRole>,
    pub action_label: Option<ActionLabel>,
    pub spinner_visible: Option<bool>,
    pub action_enabled: Option<bool>,
    pub pager_enabled: Option<bool>,
}

impl ViewStateDescriptor {
    /// Descriptor that leaves every widget untouched
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

/// Descriptor plus the effects a status asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub descriptor: ViewStateDescriptor,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(descriptor: ViewStateDescriptor, effects: Vec<Effect>) -> Self {
        Self {
            descriptor,
            effects,
        }
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }
}

/// What pressing the action button asks the service to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceCommand {
    Start,
    Stop,
}

/// Map a lifecycle status to the view state and effects it implies.
///
/// Pure and total: unknown statuses leave the view untouched.
pub fn derive(status: LifecycleStatus) -> Transition {
    match status {
        LifecycleStatus::Stopped => Transition::new(
            ViewStateDescriptor {
                action_icon: Some(ActionIcon::Play),
                action_tint: Some(TintRole::Primary),
                action_label: Some(ActionLabel::Connect),
                spinner_visible: Some(false),
                action_enabled: Some(true),
                pager_enabled: None,
            },
            Vec::new(),
        ),
        LifecycleStatus::Starting => Transition::new(
            ViewStateDescriptor {
                action_icon: Some(ActionIcon::Play),
                action_tint: Some(TintRole::Tertiary),
                action_label: Some(ActionLabel::Connecting),
                spinner_visible: Some(true),
                action_enabled: Some(false),
                pager_enabled: None,
            },
            Vec::new(),
        ),
        LifecycleStatus::Started => Transition::new(
            ViewStateDescriptor {
                action_icon: Some(ActionIcon::Stop),
                action_tint: Some(TintRole::Error),
                action_label: Some(ActionLabel::Disconnect),
                spinner_visible: Some(false),
                action_enabled: Some(true),
                pager_enabled: Some(true),
            },
            vec![Effect::CheckNotices, Effect::EnablePager],
        ),
        LifecycleStatus::Stopping => Transition::new(
            ViewStateDescriptor {
                action_icon: None,
                action_tint: None,
                action_label: Some(ActionLabel::Disconnecting),
                spinner_visible: Some(true),
                action_enabled: Some(false),
                pager_enabled: None,
            },
            Vec::new(),
        ),
        LifecycleStatus::Unknown(_) => {
            Transition::new(ViewStateDescriptor::unchanged(), Vec::new())
        }
    }
}

/// Command issued by a press of the action button in the given status
pub fn action_for(status: LifecycleStatus) -> Option<ServiceCommand> {
    match status {
        LifecycleStatus::Stopped => Some(ServiceCommand::Start),
        LifecycleStatus::Started => Some(ServiceCommand::Stop),
        _ => None,
    }
}
