//! The browser history boundary.
//!
//! The router only needs to read the current location, push new entries and set the page
//! title. [`BrowserHistory`] does this with `window.history`, [`MemoryHistory`] keeps the stack
//! in memory for tests and hosts without a browser.
//!
//! [`BrowserHistory`]: ../browser/struct.BrowserHistory.html
//! [`MemoryHistory`]: struct.MemoryHistory.html

use url::Url;

use crate::error::Result;

/// Session history the router reads from and writes to.
pub trait History {
    /// The current location as an absolute url.
    fn location(&self) -> Result<Url>;

    /// Add a new entry and make it current.
    fn push_state(&mut self, url: &Url) -> Result<()>;

    /// Set the document title.
    fn set_title(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }
}

/// An in-memory history stack with browser semantics.
///
/// Pushing discards every entry after the current one. Moving with [`back`], [`forward`] or
/// [`go`] only changes the current entry, the router still has to be told, just like a
/// `popstate` event tells it in the browser.
///
/// [`back`]: #method.back
/// [`forward`]: #method.forward
/// [`go`]: #method.go
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Url>,
    index: usize,
    title: String,
}

impl MemoryHistory {
    /// Start with a single entry.
    pub fn new(start: &str) -> Result<Self> {
        Ok(MemoryHistory {
            entries: vec![Url::parse(start)?],
            index: 0,
            title: String::new(),
        })
    }

    /// Move `delta` entries, clamped to the ends of the stack. Returns whether anything moved.
    pub fn go(&mut self, delta: isize) -> bool {
        let last = self.entries.len() as isize - 1;
        let target = (self.index as isize + delta).max(0).min(last) as usize;
        let moved = target != self.index;
        self.index = target;
        moved
    }

    pub fn back(&mut self) -> bool {
        self.go(-1)
    }

    pub fn forward(&mut self) -> bool {
        self.go(1)
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The current entry.
    pub fn current(&self) -> &Url {
        &self.entries[self.index]
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        MemoryHistory {
            entries: vec![Url::parse("http://localhost/").expect("static url")],
            index: 0,
            title: String::new(),
        }
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Result<Url> {
        Ok(self.current().clone())
    }

    fn push_state(&mut self, url: &Url) -> Result<()> {
        self.entries.truncate(self.index + 1);
        self.entries.push(url.clone());
        self.index = self.entries.len() - 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = title.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(text: &str) -> Url {
        Url::parse(text).unwrap()
    }

    #[test]
    fn push_moves_forward() {
        let mut history = MemoryHistory::default();
        history.push_state(&url("http://localhost/a")).unwrap();
        history.push_state(&url("http://localhost/b")).unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history.location().unwrap().path(), "/b");
    }

    #[test]
    fn back_and_forward() {
        let mut history = MemoryHistory::new("http://localhost/start").unwrap();
        history.push_state(&url("http://localhost/next")).unwrap();

        assert!(history.back());
        assert_eq!(history.current().path(), "/start");
        assert!(!history.back());
        assert!(history.forward());
        assert_eq!(history.current().path(), "/next");
        assert!(!history.forward());
    }

    #[test]
    fn push_drops_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push_state(&url("http://localhost/a")).unwrap();
        history.push_state(&url("http://localhost/b")).unwrap();
        history.go(-2);
        history.push_state(&url("http://localhost/c")).unwrap();

        let paths: Vec<&str> = history.entries().iter().map(Url::path).collect();
        assert_eq!(paths, vec!["/", "/c"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn title_is_recorded() {
        let mut history = MemoryHistory::default();
        history.set_title("Docs").unwrap();
        assert_eq!(history.title(), "Docs");
    }
}
