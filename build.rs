//! Embeds the Git commit, branch and build profile into the binary so that the
//! `id` response of the text protocol identifies exactly what is playing.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
