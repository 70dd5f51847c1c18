//! The page facade.
//!
//! [`Page`] wires every behavior component to one [`Stage`]: it polls the
//! visibility watcher, routes fired timers to whichever component owns them,
//! and advances active reveal animations, all from a single [`Page::tick`].
//! Embedders construct the scene, assign layout rects, and call `tick` with
//! the current monotonic and wall-clock time.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::Rng;
use vitrine_core::{ElementId, Scene, Stage, TimerId, ViewportWatcher, VisibilityWatcher};

use crate::analytics::AnalyticsSink;
use crate::carousel::{Carousel, Testimonial};
use crate::config::SiteConfig;
use crate::countdown::{CountdownDisplays, CountdownTicker};
use crate::effects::{ConfettiBurst, EffectsRunner, SparkleBurst, spawn_ripple};
use crate::form::{FormError, RegistrationForm};
use crate::reveal::{RevealCoordinator, RevealOptions};

/// One page's interactivity layer.
pub struct Page {
    stage: Stage,
    watcher: ViewportWatcher,
    coordinator: RevealCoordinator,
    carousel: Option<Carousel>,
    countdown: Option<CountdownTicker>,
    form: Option<RegistrationForm>,
    effects: EffectsRunner,
    config: SiteConfig,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    disposed: bool,
}

impl Page {
    /// Create a page with the given configuration and viewport size.
    pub fn new(config: SiteConfig, viewport_width: f32, viewport_height: f32) -> Self {
        let options = RevealOptions {
            stagger_delay: config.stagger_delay(),
            counter_duration: config.counter_duration(),
            ..RevealOptions::default()
        };
        Self {
            stage: Stage::new(viewport_width, viewport_height),
            watcher: ViewportWatcher::new(),
            coordinator: RevealCoordinator::new(options),
            carousel: None,
            countdown: None,
            form: None,
            effects: EffectsRunner::new(),
            config,
            analytics: None,
            disposed: false,
        }
    }

    /// Attach an analytics sink, propagated to every installed component.
    pub fn set_analytics(&mut self, sink: Arc<dyn AnalyticsSink>) {
        self.coordinator.set_analytics(sink.clone());
        if let Some(carousel) = &mut self.carousel {
            carousel.set_analytics(sink.clone());
        }
        if let Some(form) = &mut self.form {
            form.set_analytics(sink.clone());
        }
        self.analytics = Some(sink);
    }

    /// The underlying stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The underlying stage, mutably.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        self.stage.scene()
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.stage.scene_mut()
    }

    /// The reveal coordinator.
    pub fn reveals(&self) -> &RevealCoordinator {
        &self.coordinator
    }

    /// The carousel, if installed.
    pub fn carousel_mut(&mut self) -> Option<&mut Carousel> {
        self.carousel.as_mut()
    }

    /// The registration form, if installed.
    pub fn form_mut(&mut self) -> Option<&mut RegistrationForm> {
        self.form.as_mut()
    }

    /// The effects runner.
    pub fn effects(&self) -> &EffectsRunner {
        &self.effects
    }

    /// Scan the scene for reveal markers. Safe to call again after the scene
    /// grows; already-registered elements are skipped.
    pub fn scan_reveals(&mut self) {
        self.coordinator.scan(self.stage.scene(), &mut self.watcher);
    }

    /// Install the testimonial carousel and start autoplay.
    pub fn install_carousel(&mut self, slides: Vec<Testimonial>, now: Instant) {
        let mut carousel = Carousel::new(slides);
        carousel.set_autoplay_interval(self.config.carousel_autoplay());
        if let Some(sink) = &self.analytics {
            carousel.set_analytics(sink.clone());
        }
        carousel.start_autoplay(self.stage.timers_mut(), now);
        self.carousel = Some(carousel);
    }

    /// Install the countdown if the configuration carries a usable target.
    /// Without one the page simply has no countdown.
    pub fn install_countdown(
        &mut self,
        displays: CountdownDisplays,
        now: Instant,
        wall: DateTime<Utc>,
    ) {
        let Some(target) = self.config.countdown_target() else {
            tracing::debug!(target: "vitrine::page", "no countdown target configured");
            return;
        };
        let mut ticker = CountdownTicker::new(target, displays);
        let (scene, timers) = self.stage.scene_and_timers();
        ticker.start(scene, timers, now, wall);
        self.countdown = Some(ticker);
    }

    /// Install the registration form with the configured pricing.
    pub fn install_form(&mut self) {
        let mut form = RegistrationForm::with_pricing(self.config.pricing.into());
        if let Some(sink) = &self.analytics {
            form.set_analytics(sink.clone());
        }
        self.form = Some(form);
    }

    /// Submit the installed form.
    pub fn submit_form(&mut self, now: Instant, wall: DateTime<Utc>) -> Result<(), FormError> {
        let Some(form) = &mut self.form else {
            return Err(FormError::NotInstalled);
        };
        form.submit(self.stage.timers_mut(), now, wall)
    }

    /// Launch a confetti burst across the viewport.
    pub fn spawn_confetti(&mut self, rng: &mut impl Rng, count: usize, now: Instant) {
        let viewport = self.stage.viewport();
        let burst = ConfettiBurst::spawn(rng, count, viewport);
        self.effects.add(Box::new(burst), self.stage.timers_mut(), now);
    }

    /// Launch a sparkle burst at a point.
    pub fn spawn_sparkles(&mut self, rng: &mut impl Rng, count: usize, x: f32, y: f32, now: Instant) {
        let burst = SparkleBurst::spawn(rng, count, x, y);
        self.effects.add(Box::new(burst), self.stage.timers_mut(), now);
    }

    /// Spawn a click ripple inside a button.
    pub fn ripple(&mut self, button: ElementId, click_x: f32, click_y: f32) -> Option<ElementId> {
        spawn_ripple(self.stage.scene_mut(), button, click_x, click_y)
    }

    /// Advance the whole page to `now`.
    ///
    /// Polls visibility, fires due timers and routes them to their owners,
    /// then advances active reveal animations. `wall` is the wall-clock time
    /// matching `now`; the countdown and form timestamps come from it.
    pub fn tick(&mut self, now: Instant, wall: DateTime<Utc>) {
        if self.disposed {
            return;
        }

        let viewport = self.stage.viewport();
        let events = self.watcher.poll(self.stage.scene(), viewport);
        {
            let (scene, timers) = self.stage.scene_and_timers();
            for event in events {
                self.coordinator.on_visibility(event, scene, timers, now);
            }
        }

        let fired = self.stage.tick(now);
        for timer in fired {
            self.route_timer(timer, now, wall);
        }

        self.coordinator.update(now, self.stage.scene_mut());
    }

    fn route_timer(&mut self, timer: TimerId, now: Instant, wall: DateTime<Utc>) {
        {
            let (scene, timers) = self.stage.scene_and_timers();
            if self.coordinator.on_timer(timer, scene, timers, now) {
                return;
            }
            if let Some(countdown) = &mut self.countdown
                && countdown.on_timer(timer, scene, timers, now, wall)
            {
                return;
            }
        }
        if let Some(carousel) = &mut self.carousel
            && carousel.on_timer(timer)
        {
            return;
        }
        if let Some(form) = &mut self.form
            && form.on_timer(timer)
        {
            return;
        }
        if self.effects.on_timer(timer, self.stage.timers_mut()) {
            return;
        }
        tracing::trace!(target: "vitrine::page", ?timer, "timer had no owner");
    }

    /// Tear the page down: stop every component, drop pending timers, and
    /// ignore all further ticks. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.coordinator.dispose(&mut self.watcher, self.stage.timers_mut());
        if let Some(carousel) = &mut self.carousel {
            carousel.stop_autoplay(self.stage.timers_mut());
        }
        if let Some(countdown) = &mut self.countdown {
            countdown.stop(self.stage.timers_mut());
        }
        if let Some(form) = &mut self.form {
            form.cancel(self.stage.timers_mut());
        }
        self.effects.dispose(self.stage.timers_mut());
        self.watcher.clear();
        self.stage.shutdown();
        self.disposed = true;
        tracing::info!(target: "vitrine::page", "page disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Field, SubmitState};
    use crate::reveal::REVEALED_CLASS;
    use std::time::Duration;
    use vitrine_core::Rect;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn page() -> Page {
        Page::new(SiteConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn test_scroll_reveal_end_to_end() {
        let mut page = page();
        let now = Instant::now();
        let wall = Utc::now();

        let el = page.scene_mut().create_element("section");
        page.scene_mut().set_attribute(el, "data-reveal", "fade-up");
        // Below the fold.
        page.scene_mut().set_rect(el, Rect::new(0.0, 900.0, 400.0, 200.0));
        page.scan_reveals();

        page.tick(now, wall);
        assert!(!page.reveals().is_animated(el));

        // Scrolled into view.
        page.scene_mut().set_rect(el, Rect::new(0.0, 300.0, 400.0, 200.0));
        page.tick(now + ms(16), wall);
        assert!(page.reveals().is_animated(el));

        page.tick(now + ms(16) + ms(800), wall);
        assert!(page.scene().has_class(el, REVEALED_CLASS));
        assert_eq!(page.scene().style(el).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_carousel_autoplay_through_page_tick() {
        let mut page = page();
        let now = Instant::now();
        let wall = Utc::now();

        let slides = (0..3)
            .map(|i| Testimonial {
                quote: format!("q{i}"),
                author: format!("a{i}"),
                role: String::new(),
                image_url: None,
            })
            .collect();
        page.install_carousel(slides, now);

        page.tick(now + Duration::from_secs(5), wall);
        assert_eq!(page.carousel_mut().unwrap().index(), 1);
    }

    #[test]
    fn test_form_submission_through_page_tick() {
        let mut page = page();
        let now = Instant::now();
        let wall = Utc::now();
        page.install_form();

        let form = page.form_mut().unwrap();
        form.set_value(Field::Name, "Asha Rao");
        form.set_value(Field::Email, "asha@example.com");
        form.set_value(Field::Phone, "9876543210");
        form.set_value(Field::College, "IIT Madras");
        form.set_value(Field::Experience, "beginner");
        form.set_value(Field::TshirtSize, "M");
        form.set_value(Field::Accommodation, "no");
        form.set_value(Field::Agreement, "yes");

        page.submit_form(now, wall).unwrap();
        page.tick(now + Duration::from_secs(2), wall);

        let SubmitState::Succeeded { registration_id } = page.form_mut().unwrap().state().clone()
        else {
            panic!("submission did not resolve");
        };
        assert!(registration_id.starts_with("ESM"));
    }

    #[test]
    fn test_countdown_installed_only_with_target() {
        let now = Instant::now();
        let wall = Utc::now();

        let mut bare = page();
        bare.install_countdown(CountdownDisplays::default(), now, wall);
        assert_eq!(bare.stage().timers().active_count(), 0);

        let config = SiteConfig {
            countdown_target: Some("2099-01-01T00:00:00Z".to_string()),
            ..SiteConfig::default()
        };
        let mut page = Page::new(config, 800.0, 600.0);
        let seconds = page.scene_mut().create_element("span");
        page.install_countdown(
            CountdownDisplays {
                seconds: Some(seconds),
                ..CountdownDisplays::default()
            },
            now,
            wall,
        );
        assert!(page.stage().timers().active_count() > 0);
        assert!(!page.scene().text(seconds).unwrap().is_empty());
    }

    #[test]
    fn test_effects_run_and_expire() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut page = page();
        let mut now = Instant::now();
        let wall = Utc::now();
        let mut rng = StdRng::seed_from_u64(1);

        page.spawn_sparkles(&mut rng, 10, 400.0, 300.0, now);
        assert!(page.effects().is_ticking());

        for _ in 0..60 {
            now += ms(16);
            page.tick(now, wall);
        }
        assert_eq!(page.effects().particle_count(), 0);
        assert!(!page.effects().is_ticking());
    }

    #[test]
    fn test_dispose_stops_the_world() {
        let mut page = page();
        let now = Instant::now();
        let wall = Utc::now();

        let el = page.scene_mut().create_element("div");
        page.scene_mut().set_attribute(el, "data-reveal", "fade-up");
        page.scene_mut().set_rect(el, Rect::new(0.0, 100.0, 100.0, 100.0));
        page.scan_reveals();
        page.install_carousel(
            vec![
                Testimonial {
                    quote: "q".into(),
                    author: "a".into(),
                    role: String::new(),
                    image_url: None,
                },
                Testimonial {
                    quote: "q2".into(),
                    author: "a2".into(),
                    role: String::new(),
                    image_url: None,
                },
            ],
            now,
        );

        page.dispose();
        assert_eq!(page.stage().timers().active_count(), 0);

        // Ticks after disposal are ignored; the reveal never fires.
        page.tick(now + Duration::from_secs(10), wall);
        assert!(!page.reveals().is_animated(el));

        page.dispose(); // idempotent
    }
}
