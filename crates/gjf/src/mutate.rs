use crate::{DEFAULT_MEM, JobDeck, Key, error::DeckError};


/// Changes to apply to every job in an input file. `None` and `false` fields
/// leave the corresponding part of the deck alone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overrides {
    /// value for `%NProcShared`
    pub nproc: Option<usize>,

    /// value for `%CPU`
    pub cpu: Option<String>,

    /// value for `%Mem`
    pub mem: Option<String>,

    /// extra route keywords, each appended as its own route line
    pub keywords: Vec<String>,

    /// add a `%Chk` directive to every job that doesn't have one
    pub chk: bool,

    /// a formatted checkpoint will be made after the run, so at least one job
    /// needs a checkpoint file
    pub fchk: bool,

    /// the file name used for added `%Chk` directives
    pub chk_name: String,

    /// `%Mem` value for jobs that end up without one
    pub default_mem: String,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            nproc: None,
            cpu: None,
            mem: None,
            keywords: Vec::new(),
            chk: false,
            fchk: false,
            chk_name: String::from("gaussian.chk"),
            default_mem: String::from(DEFAULT_MEM),
        }
    }
}

impl Overrides {
    /// Construct an [Overrides] that changes nothing except for injecting
    /// [DEFAULT_MEM], with `chk_name` for any added checkpoint directive
    pub fn new(chk_name: impl Into<String>) -> Self {
        Self {
            chk_name: chk_name.into(),
            ..Self::default()
        }
    }

    pub fn nproc(mut self, nproc: usize) -> Self {
        self.nproc = Some(nproc);
        self
    }

    pub fn cpu(mut self, cpu: impl Into<String>) -> Self {
        self.cpu = Some(cpu.into());
        self
    }

    pub fn mem(mut self, mem: impl Into<String>) -> Self {
        self.mem = Some(mem.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn chk(mut self, b: bool) -> Self {
        self.chk = b;
        self
    }

    pub fn fchk(mut self, b: bool) -> Self {
        self.fchk = b;
        self
    }

    pub fn default_mem(mut self, mem: impl Into<String>) -> Self {
        self.default_mem = mem.into();
        self
    }

    /// Apply `self` to each deck in `decks`. Every deck is rewritten even if
    /// some of them fail the final check that they don't ask for more than
    /// `available` processors. Those failures are returned together in the
    /// `Err` case
    pub fn apply(
        &self,
        decks: &mut [JobDeck],
        available: usize,
    ) -> Result<(), Vec<DeckError>> {
        // formchk needs something to convert, and one checkpoint is enough
        let force_chk =
            self.fchk && !self.chk && decks.iter().all(|d| d.chk().is_none());
        if force_chk {
            log::debug!("adding a checkpoint file for formchk");
        }

        let mut errors = Vec::new();
        for (i, deck) in decks.iter_mut().enumerate() {
            self.apply_one(deck, self.chk || (force_chk && i == 0));
            let requested = deck.nprocs();
            if requested > available {
                errors.push(DeckError::ResourceOverCommit {
                    deck: i,
                    requested,
                    available,
                });
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn apply_one(&self, deck: &mut JobDeck, chk: bool) {
        if chk && deck.chk().is_none() {
            deck.link0.set(Key::Chk, &self.chk_name);
        }
        if let Some(n) = self.nproc {
            deck.link0.set(Key::NProc, &n.to_string());
        }
        if let Some(cpu) = &self.cpu {
            // a processor list replaces the deck's own processor count
            if self.nproc.is_none() {
                deck.link0.remove(&Key::NProc);
            }
            deck.link0.set(Key::Cpu, cpu);
        }
        if let Some(mem) = &self.mem {
            deck.link0.set(Key::Mem, mem);
        }
        for kw in &self.keywords {
            deck.route.push(format!("{kw}\n"));
        }
        if deck.mem().is_none() {
            deck.link0.set(Key::Mem, &self.default_mem);
        }
    }
}
