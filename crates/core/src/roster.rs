//! The fixed avatar roster.
//!
//! Sample-based passes pick one of 21 fixed (name, tagline) pairs plus one
//! of three pre-rendered sample images. Selection is uniform over the
//! roster; the RNG is injected so callers can seed it deterministically.

use rand::Rng;

/// One roster entry: avatar display name and its tagline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: &'static str,
    pub tagline: &'static str,
}

/// Tagline attached to every remotely generated custom avatar.
pub const CUSTOM_AVATAR_TAGLINE: &str = "Trailblazing a better world by design!";

/// Number of pre-rendered sample images per avatar type.
pub const SAMPLES_PER_TYPE: u32 = 3;

/// The 21 fixed (name, tagline) pairs, parallel by index.
pub const ROSTER: [RosterEntry; 21] = [
    RosterEntry {
        name: "Innovative engineer",
        tagline: "Building the future with innovation!",
    },
    RosterEntry {
        name: "Interdisciplinary architect",
        tagline: "Designing spaces that inspire!",
    },
    RosterEntry {
        name: "Collaborative designer",
        tagline: "Crafting solutions with creativity!",
    },
    RosterEntry {
        name: "Design-centric creator",
        tagline: "Bringing visionary ideas to life!",
    },
    RosterEntry {
        name: "Tech-savvy developer",
        tagline: "Coding the blueprint of tomorrow!",
    },
    RosterEntry {
        name: "Hands-on builder",
        tagline: "Constructing dreams with hands-on expertise!",
    },
    RosterEntry {
        name: "Creative innovator",
        tagline: "Pioneering breakthroughs in design and technology!",
    },
    RosterEntry {
        name: "Problem-solving analyst",
        tagline: "Solving problems with precision and insight!",
    },
    RosterEntry {
        name: "Sustainable-minded planner",
        tagline: "Shaping sustainable futures with foresight!",
    },
    RosterEntry {
        name: "Entrepreneurial visionary",
        tagline: "Leading the way with entrepreneurial spirit!",
    },
    RosterEntry {
        name: "Adaptive learner",
        tagline: "Adapting to challenges with curiosity!",
    },
    RosterEntry {
        name: "Human-centered designer",
        tagline: "Crafting solutions with creativity!",
    },
    RosterEntry {
        name: "Project-driven manager",
        tagline: "Driving projects to success with leadership!",
    },
    RosterEntry {
        name: "Critical-thinking researcher",
        tagline: "Exploring new frontiers with critical thinking!",
    },
    RosterEntry {
        name: "Resilient problem-solver",
        tagline: "Overcoming obstacles with resilience!",
    },
    RosterEntry {
        name: "Experimental thinker",
        tagline: "Experimenting with bold ideas!",
    },
    RosterEntry {
        name: "Globally-aware strategist",
        tagline: "Navigating global challenges with insight!",
    },
    RosterEntry {
        name: "Digitally-literate technologist",
        tagline: "Innovating with digital expertise!",
    },
    RosterEntry {
        name: "Visionary futurist",
        tagline: "Envisioning tomorrow with creativity!",
    },
    RosterEntry {
        name: "Holistic systems-thinker",
        tagline: "Designing holistic solutions for complex problems!",
    },
    RosterEntry {
        name: "Inclusive leader",
        tagline: "Trailblazing a better world by design!",
    },
];

/// Pick a roster entry uniformly at random.
pub fn pick_entry<R: Rng + ?Sized>(rng: &mut R) -> RosterEntry {
    ROSTER[rng.random_range(0..ROSTER.len())]
}

/// Pick a sample image index in `1..=SAMPLES_PER_TYPE` uniformly at random.
pub fn pick_sample_index<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(1..=SAMPLES_PER_TYPE)
}
