//! The fixed avatar-generation workflow template.
//!
//! An opaque ComfyUI stage graph parameterized by the avatar type and
//! personal interest. The graph mirrors what the service expects (stage
//! kinds, wiring between stage outputs) and is never introspected after
//! construction -- it is submitted as-is.

use rand::Rng;

/// Negative prompt applied to every avatar generation.
const NEGATIVE_PROMPT: &str = "low quality, blurry, deformed, watermark, text, signature, \
                               depth of field, photoreal, white background";

/// Build the avatar workflow for one generation request.
///
/// Embeds `avatar_type` and `personal_interest` into the positive prompt;
/// everything else (checkpoint, LoRA, sampler settings, latent size) is
/// fixed. The sampler seed is randomized per request so repeated requests
/// for the same inputs produce fresh images.
pub fn avatar_workflow(avatar_type: &str, personal_interest: &str) -> serde_json::Value {
    let seed: u64 = rand::rng().random_range(0..=u64::from(u32::MAX));
    avatar_workflow_with_seed(avatar_type, personal_interest, seed)
}

/// As [`avatar_workflow`], with an explicit sampler seed.
pub fn avatar_workflow_with_seed(
    avatar_type: &str,
    personal_interest: &str,
    seed: u64,
) -> serde_json::Value {
    let positive_prompt = format!(
        "anthropomorphic {personal_interest} character close up of upper body, \
         character focus, young {avatar_type} student, in action, simple, \
         flat colors, stardew valley style, pixel art style"
    );

    serde_json::json!({
        "3": {
            "inputs": {
                "seed": seed,
                "steps": 30,
                "cfg": 7,
                "sampler_name": "euler_ancestral",
                "scheduler": "karras",
                "denoise": 1,
                "model": ["39", 0],
                "positive": ["6", 0],
                "negative": ["7", 0],
                "latent_image": ["40", 0],
            },
            "class_type": "KSampler",
        },
        "4": {
            "inputs": {
                "ckpt_name": "sdXL_v10VAEFix.safetensors",
            },
            "class_type": "CheckpointLoaderSimple",
        },
        "6": {
            "inputs": {
                "text": positive_prompt,
                "clip": ["39", 1],
            },
            "class_type": "CLIPTextEncode",
        },
        "7": {
            "inputs": {
                "text": NEGATIVE_PROMPT,
                "clip": ["39", 1],
            },
            "class_type": "CLIPTextEncode",
        },
        "25": {
            "inputs": {
                "samples": ["3", 0],
                "vae": ["4", 2],
            },
            "class_type": "VAEDecode",
        },
        "38": {
            "inputs": {
                "filename_prefix": "pixelbuildings128-v1-raw-",
                "images": ["25", 0],
            },
            "class_type": "SaveImage",
        },
        "39": {
            "inputs": {
                "lora_name": "pixel-art-xl-v1.1.safetensors",
                "strength_model": 1,
                "strength_clip": 1,
                "model": ["4", 0],
                "clip": ["4", 1],
            },
            "class_type": "LoraLoader",
        },
        "40": {
            "inputs": {
                "width": 1024,
                "height": 1024,
                "batch_size": 1,
            },
            "class_type": "EmptyLatentImage",
        },
    })
}
