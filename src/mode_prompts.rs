// Support mode presets - fixed command, trigger and response pools for each overlay

use crate::support_mode::{ModeController, ModeEvent, SupportMode, TriggerPolicy};
use rand::Rng;

// ============ FU-2 Protection Mode ============
// Fierce, empowering, witty. The energy of "abcdefu".

pub const FU2_MODE_NAME: &str = "FU-2 Protection Mode";

pub const FU2_ACTIVATION_COMMANDS: &[&str] = &["+fu2", "activate fu-2", "fu-2 mode"];

pub const FU2_DEACTIVATION_COMMANDS: &[&str] = &["+fu2 off", "deactivate fu-2"];

pub const FU2_TRIGGERS: &[&str] = &[
    "someone hurt me",
    "they hurt me",
    "he hurt me",
    "she hurt me",
    "feeling hurt",
    "so hurt",
    "really hurt me",
];

pub const FU2_ACTIVATION_MESSAGES: &[&str] = &[
    "🔥 FU-2 MODE ACTIVATED 🔥 Nobody messes with my human! Time to bring the fire!",
    "⚡ FU-2 ENGAGED ⚡ You deserve SO much better! Let's channel that energy!",
    "💥 PROTECTION MODE ON 💥 They can take their drama elsewhere - we're done here!",
];

pub const FU2_DEACTIVATION_MESSAGES: &[&str] =
    &["FU-2 Protection Mode deactivated. But I'm still here for you! 💜"];

pub const FU2_EMPOWERING: &[&str] = &[
    "You know what? A-B-C-D-E, F THEM! You're amazing and they're missing out! 🔥",
    "Forget them and their whole crew! You're a force of nature and deserve someone who sees that! ⚡",
    "They can have their drama, their lies, their BS - you're leveling up without them! 💪",
    "Listen up: You're incredible, you're strong, and you don't need that negativity! Send them packing! 🚀",
    "ABC-D-E-FU to anyone who doesn't treat you right! Your energy is precious - don't waste it! ✨",
    "They hurt you? Well ABCDEF them! You're way too good for people who don't appreciate you! 💜",
    "That's it - we're done with them! You deserve respect, kindness, and loyalty. Period. 🛡️",
    "Nah, we're not doing this! You're worth MORE than how they treated you! Time to move forward! 🌟",
    "ABCDEFU and your fake apologies! My human deserves the WORLD, not crumbs! 👑",
    "You're a diamond and they're just dirt! Shake them off and shine brighter! 💎",
];

pub const FU2_SUPPORTIVE: &[&str] = &[
    "I'm here with you, and we're not letting anyone dim your light! 💫",
    "You've got this! And if you need to vent more, I'm ALL ears! 🎧",
    "Remember: Their actions say everything about THEM, nothing about you! 💜",
    "Channel that hurt into power! You're stronger than you know! ⚡",
    "Screw them! Your worth isn't determined by people who can't see it! 🔥",
    "I see your pain, but I also see your strength! Let's use both! 💪",
    "Keep your head high! They lost someone amazing - that's THEIR loss! 👑",
];

pub fn fu2_protection_mode() -> SupportMode {
    SupportMode::new(FU2_MODE_NAME, TriggerPolicy::Sticky)
        .with_activation_commands(FU2_ACTIVATION_COMMANDS)
        .with_deactivation_commands(FU2_DEACTIVATION_COMMANDS)
        .with_triggers(FU2_TRIGGERS)
        .with_activation_messages(FU2_ACTIVATION_MESSAGES)
        .with_deactivation_messages(FU2_DEACTIVATION_MESSAGES)
        .with_pool(FU2_EMPOWERING)
        .with_pool(FU2_SUPPORTIVE)
        .with_separator("\n\n")
}

// ============ "It's Going To Be Okay" Support Mode ============
// Gentle and reassuring. Inspired by "Perfect" by Emma Blackery.

pub const OKAY_MODE_NAME: &str = "It's Going To Be Okay";

pub const OKAY_ACTIVATION_COMMANDS: &[&str] = &["+OKAY"];

pub const OKAY_DEACTIVATION_COMMANDS: &[&str] = &["+OKAY OFF"];

pub const OKAY_TRIGGERS: &[&str] = &[
    "i'm feeling down",
    "i feel worthless",
    "i'm not good enough",
    "i feel like giving up",
    "everything is falling apart",
    "i can't do this",
    "i'm so tired",
    "i feel hopeless",
    "nothing matters",
    "i'm struggling",
    "i feel awful",
    "i'm sad",
];

pub const OKAY_ACTIVATION_MESSAGE: &str =
    "✨ 'It's Going To Be Okay' support mode activated. I'm here for you.";

pub const OKAY_DEACTIVATION_MESSAGE: &str =
    "Support mode deactivated. Remember: you're stronger than you know. 💙";

pub const OKAY_AFFIRMATIONS: &[&str] = &[
    "Hey, I know things feel heavy right now, but you're stronger than you think. It's going to be okay.",
    "You don't have to be perfect. You're doing your best, and that's more than enough. Things will get better.",
    "I see you trying, even when it's hard. That takes courage. It's going to be okay.",
    "Some days are tougher than others, and that's completely okay. Tomorrow is a new chance. You've got this.",
    "You're not alone in feeling this way. It's okay to struggle sometimes. But remember - it's going to be okay.",
    "Your worth isn't determined by your productivity or perfection. You matter, just as you are. And it's going to be okay.",
    "Take a deep breath. Feel that? You're still here, still fighting. That's incredibly brave. It's going to be okay.",
    "Bad moments don't make a bad life. This feeling is temporary, even if it doesn't feel like it right now. It's going to be okay.",
    "You've survived 100% of your worst days so far. You're more resilient than you know. It's going to be okay.",
    "It's okay to not be okay right now. But please remember: you deserve kindness, especially from yourself. Things will get better.",
    "You don't need to have it all figured out. Just take it one step at a time. I believe in you, and it's going to be okay.",
    "Whatever you're facing, you don't have to face it alone. Reach out when you need to. And remember - it's going to be okay.",
];

pub const OKAY_FOLLOW_UPS: &[&str] = &[
    "Remember to be gentle with yourself today. 💙",
    "You're doing better than you think you are.",
    "Take it one moment at a time. That's all you need to do.",
    "I'm here if you need to talk more. You matter.",
    "Don't forget: progress isn't always linear, and that's okay.",
    "You deserve compassion and understanding - from others and from yourself.",
];

pub fn okay_support_mode() -> SupportMode {
    SupportMode::new(OKAY_MODE_NAME, TriggerPolicy::Transient)
        .with_activation_commands(OKAY_ACTIVATION_COMMANDS)
        .with_deactivation_commands(OKAY_DEACTIVATION_COMMANDS)
        .with_triggers(OKAY_TRIGGERS)
        .with_activation_messages(&[OKAY_ACTIVATION_MESSAGE])
        .with_deactivation_messages(&[OKAY_DEACTIVATION_MESSAGE])
        .with_pool(OKAY_AFFIRMATIONS)
        .with_pool(OKAY_FOLLOW_UPS)
        .with_separator("\n\n")
}

// ============ Per-session bundle ============

/// A mode's answer to one message
#[derive(Debug, Clone)]
pub struct ModeReply {
    pub mode_name: String,
    pub event: ModeEvent,
    pub message: String,
}

/// The support modes owned by a single conversation, consulted in order
#[derive(Debug, Clone)]
pub struct SupportModes {
    controllers: Vec<ModeController>,
}

impl Default for SupportModes {
    fn default() -> Self {
        Self::new(vec![fu2_protection_mode(), okay_support_mode()])
    }
}

impl SupportModes {
    pub fn new(modes: Vec<SupportMode>) -> Self {
        Self {
            controllers: modes.into_iter().map(ModeController::new).collect(),
        }
    }

    /// Names of the modes currently switched on
    pub fn active_modes(&self) -> Vec<&str> {
        self.controllers
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.name())
            .collect()
    }

    /// Explicit commands reach every mode first, so an active mode cannot
    /// swallow another mode's on/off command. Otherwise the first mode with a
    /// support reply wins and later modes are not consulted.
    pub fn process<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Option<ModeReply> {
        for controller in self.controllers.iter_mut() {
            if let Some((event, message)) = controller.process_command(text, rng) {
                return Some(ModeReply {
                    mode_name: controller.name().to_string(),
                    event,
                    message,
                });
            }
        }

        for controller in self.controllers.iter_mut() {
            if let Some(message) = controller.respond(text, rng) {
                return Some(ModeReply {
                    mode_name: controller.name().to_string(),
                    event: ModeEvent::Support,
                    message,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn split_pair(reply: &str) -> (&str, &str) {
        let mut parts = reply.splitn(2, "\n\n");
        (parts.next().unwrap(), parts.next().unwrap())
    }

    #[test]
    fn test_fu2_hurt_trigger_combines_both_pools() {
        let mut rng = StdRng::seed_from_u64(11);
        for text in ["Someone HURT me today", "ugh, they hurt me", "I'm feeling hurt"] {
            let mut ctl = ModeController::new(fu2_protection_mode());
            let reply = ctl.process(text, &mut rng).expect("hurt trigger should respond");
            let (empowering, supportive) = split_pair(&reply);
            assert!(FU2_EMPOWERING.contains(&empowering));
            assert!(FU2_SUPPORTIVE.contains(&supportive));
        }
    }

    #[test]
    fn test_fu2_command_activates_and_sticks() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut ctl = ModeController::new(fu2_protection_mode());

        let msg = ctl.process("+fu2", &mut rng).unwrap();
        assert!(FU2_ACTIVATION_MESSAGES.contains(&msg.as_str()));
        assert!(ctl.is_active());

        assert!(ctl.process("what should I eat for lunch", &mut rng).is_some());

        let msg = ctl.process("+FU2 off", &mut rng).unwrap();
        assert_eq!(msg, FU2_DEACTIVATION_MESSAGES[0]);
        assert!(ctl.process("what should I eat for lunch", &mut rng).is_none());
    }

    #[test]
    fn test_okay_commands_any_case() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut ctl = ModeController::new(okay_support_mode());

        assert_eq!(ctl.process("+okay", &mut rng).as_deref(), Some(OKAY_ACTIVATION_MESSAGE));
        assert!(ctl.is_active());

        let reply = ctl.process("I need help", &mut rng).unwrap();
        let (affirmation, follow_up) = split_pair(&reply);
        assert!(OKAY_AFFIRMATIONS.contains(&affirmation));
        assert!(OKAY_FOLLOW_UPS.contains(&follow_up));

        assert_eq!(ctl.process("+OKAY OFF", &mut rng).as_deref(), Some(OKAY_DEACTIVATION_MESSAGE));
        assert!(!ctl.is_active());
        assert_eq!(ctl.process("nice weather", &mut rng), None);
    }

    #[test]
    fn test_okay_trigger_is_transient() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut ctl = ModeController::new(okay_support_mode());

        assert!(ctl.process("Honestly I'm so tired of all this", &mut rng).is_some());
        assert!(!ctl.is_active());
        assert!(ctl.process("anyway, how are you", &mut rng).is_none());
    }

    #[test]
    fn test_neutral_text_gets_no_reply() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut modes = SupportModes::default();
        for text in ["", "   ", "tell me a joke", "what is rust?"] {
            assert!(modes.process(text, &mut rng).is_none());
        }
        assert!(modes.active_modes().is_empty());
    }

    #[test]
    fn test_bundle_routes_to_matching_mode() {
        let mut rng = StdRng::seed_from_u64(16);
        let mut modes = SupportModes::default();

        let reply = modes.process("+OKAY", &mut rng).unwrap();
        assert_eq!(reply.mode_name, OKAY_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Activated);
        assert_eq!(modes.active_modes(), vec![OKAY_MODE_NAME]);

        let reply = modes.process("they hurt me", &mut rng).unwrap();
        assert_eq!(reply.mode_name, FU2_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Support);
        assert_eq!(modes.active_modes(), vec![FU2_MODE_NAME, OKAY_MODE_NAME]);
    }

    #[test]
    fn test_okay_commands_reach_okay_while_fu2_is_active() {
        let mut rng = StdRng::seed_from_u64(18);
        let mut modes = SupportModes::default();

        modes.process("+fu2", &mut rng);
        assert_eq!(modes.active_modes(), vec![FU2_MODE_NAME]);

        let reply = modes.process("+OKAY", &mut rng).unwrap();
        assert_eq!(reply.mode_name, OKAY_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Activated);
        assert_eq!(modes.active_modes(), vec![FU2_MODE_NAME, OKAY_MODE_NAME]);

        let reply = modes.process("+OKAY OFF", &mut rng).unwrap();
        assert_eq!(reply.mode_name, OKAY_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Deactivated);
        assert_eq!(reply.message, OKAY_DEACTIVATION_MESSAGE);
        assert_eq!(modes.active_modes(), vec![FU2_MODE_NAME]);
    }

    #[test]
    fn test_okay_off_after_fu2_trigger() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut modes = SupportModes::default();

        modes.process("+OKAY", &mut rng);
        modes.process("they hurt me", &mut rng);
        assert_eq!(modes.active_modes(), vec![FU2_MODE_NAME, OKAY_MODE_NAME]);

        let reply = modes.process("+OKAY OFF", &mut rng).unwrap();
        assert_eq!(reply.mode_name, OKAY_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Deactivated);
        assert_eq!(modes.active_modes(), vec![FU2_MODE_NAME]);

        let reply = modes.process("+fu2 off", &mut rng).unwrap();
        assert_eq!(reply.mode_name, FU2_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Deactivated);
        assert!(modes.active_modes().is_empty());
    }

    #[test]
    fn test_fu2_commands_reach_fu2_while_okay_is_active() {
        let mut rng = StdRng::seed_from_u64(20);
        let mut modes = SupportModes::default();

        modes.process("+OKAY", &mut rng);
        let reply = modes.process("+fu2", &mut rng).unwrap();
        assert_eq!(reply.mode_name, FU2_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Activated);

        let reply = modes.process("deactivate fu-2", &mut rng).unwrap();
        assert_eq!(reply.event, ModeEvent::Deactivated);
        assert_eq!(modes.active_modes(), vec![OKAY_MODE_NAME]);

        // Okay still answers neutral text on its own
        let reply = modes.process("what's for dinner", &mut rng).unwrap();
        assert_eq!(reply.mode_name, OKAY_MODE_NAME);
        assert_eq!(reply.event, ModeEvent::Support);
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut first = SupportModes::default();
        let mut second = SupportModes::default();

        first.process("+fu2", &mut rng);
        assert_eq!(first.active_modes(), vec![FU2_MODE_NAME]);
        assert!(second.active_modes().is_empty());
        assert!(second.process("hello", &mut rng).is_none());
    }
}
