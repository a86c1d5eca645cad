//! Localized notification messages

/// Supported notification locales. Arabic is the default; the deployments
/// this dispatcher grew out of serve Arabic-speaking teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
	#[default]
	Ar,
	En,
}

/// Rendered notification title and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
	pub title: Box<str>,
	pub body: Box<str>,
}

/// Display name used when the assigner's profile has no name
pub fn fallback_assigner_name(locale: Locale) -> &'static str {
	match locale {
		Locale::Ar => "المدير",
		Locale::En => "Manager",
	}
}

/// Build the task-assignment notification for a locale
pub fn task_assigned_message(
	locale: Locale,
	task_title: &str,
	assigned_by: &str,
) -> NotificationMessage {
	match locale {
		Locale::Ar => NotificationMessage {
			title: "مهمة جديدة مُسندة إليك".into(),
			body: format!("تم تكليفك بمهمة: {} من قِبل {}", task_title, assigned_by).into(),
		},
		Locale::En => NotificationMessage {
			title: "New task assigned to you".into(),
			body: format!("You have been assigned task: {} by {}", task_title, assigned_by).into(),
		},
	}
}


// vim: ts=4
