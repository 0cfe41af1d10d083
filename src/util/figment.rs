use error_stack::{Context, Report};

// Figment errors are chained and carry where the bad value came
// from (file or environment variable), so every link in the chain
// is attached to the report as its own line.
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(mut self, error: figment::Error) -> Report<T> {
        for e in error {
            let mut line = e.kind.to_string();

            if let (Some(profile), Some(md)) = (&e.profile, &e.metadata) {
                if !e.path.is_empty() {
                    let key = md.interpolate(profile, &e.path);
                    line.push_str(&format!(" for key {key:?}"));
                }
            }

            if let Some(md) = &e.metadata {
                match &md.source {
                    Some(source) => line.push_str(&format!(" in {source} {}", md.name)),
                    None => line.push_str(&format!(" in {}", md.name)),
                }
            }

            self = self.attach_printable(line);
        }
        self
    }
}
