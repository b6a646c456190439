//! Injected stylesheet rules.
//!
//! The page's own stylesheet does not know about the states the controllers
//! drive, so the rules they rely on are injected at runtime. Each sheet has a
//! stable element id and is injected at most once.

use tracing::debug;

use crate::host::Host;

/// A stylesheet identified by the id of its `<style>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSheet {
    pub id: &'static str,
    pub css: &'static str,
}

/// Hero initial states and the open mobile menu panel.
pub const BASE_STYLES: StyleSheet = StyleSheet {
    id: "folio-base-styles",
    css: r#"
.hero__content {
  opacity: 0;
  transform: translateY(50px);
  transition: all 0.8s ease-out;
}

.hero__avatar, .hero__name, .hero__location, .hero__tagline, .hero__description, .hero__cta {
  opacity: 0;
  transform: translateY(20px);
  transition: all 0.6s ease-out;
}

.nav__menu--active {
  display: flex !important;
  flex-direction: column;
  position: absolute;
  top: 100%;
  left: 0;
  right: 0;
  background: rgba(15, 23, 42, 0.95);
  backdrop-filter: blur(20px);
  padding: 1rem;
  gap: 0.5rem;
}
"#,
};

/// Keyframes driving the background particles.
pub const PARTICLE_KEYFRAMES: StyleSheet = StyleSheet {
    id: "particle-animations",
    css: r#"
@keyframes floatUp {
  0% {
    transform: translateY(0) rotate(0deg);
    opacity: 0;
  }
  10% {
    opacity: 0.6;
  }
  90% {
    opacity: 0.6;
  }
  100% {
    transform: translateY(-100vh) rotate(360deg);
    opacity: 0;
  }
}
"#,
};

/// Insert `sheet` unless an element with its id already exists.
///
/// Returns `true` when the sheet was inserted by this call.
pub fn inject<H: Host>(host: &mut H, sheet: &StyleSheet) -> bool {
    if host.element_by_id(sheet.id).is_some() {
        debug!(id = sheet.id, "stylesheet already present");
        return false;
    }
    host.insert_stylesheet(sheet.id, sheet.css);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_inject_is_idempotent() {
        let mut host = MemoryHost::new();

        assert!(inject(&mut host, &PARTICLE_KEYFRAMES));
        assert!(!inject(&mut host, &PARTICLE_KEYFRAMES));
        assert_eq!(host.query_all("style").len(), 1);
    }

    #[test]
    fn test_existing_sheet_is_respected() {
        let mut host = MemoryHost::new();
        let existing = host.append(None, "style", "");
        host.set_attr(existing, "id", BASE_STYLES.id);

        assert!(!inject(&mut host, &BASE_STYLES));
        assert_eq!(host.query_all("style").len(), 1);
    }

    #[test]
    fn test_sheets_carry_their_rules() {
        assert!(PARTICLE_KEYFRAMES.css.contains("@keyframes floatUp"));
        assert!(BASE_STYLES.css.contains(".nav__menu--active"));
        assert_ne!(PARTICLE_KEYFRAMES.id, BASE_STYLES.id);
    }
}
