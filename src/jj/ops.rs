//! Thin revision operations layered over [`Client::run`].

use super::{Client, CommandError};
use std::path::Path;

impl Client {
    /// Create a new empty revision on top of the current working copy.
    pub fn new_revision(&self) -> Result<(), CommandError> {
        self.run(&["new"])?;
        Ok(())
    }

    /// Create a new empty revision in a specific directory.
    pub fn new_revision_in(&self, dir: &Path) -> Result<(), CommandError> {
        self.run_in(dir, &["new"])?;
        Ok(())
    }

    /// Create a new empty revision based on a specific revision.
    pub fn new_from(&self, revision: &str) -> Result<(), CommandError> {
        self.run(&["new", revision])?;
        Ok(())
    }

    /// Create a new empty revision based on a specific revision, in a
    /// specific directory.
    pub fn new_from_in(&self, dir: &Path, revision: &str) -> Result<(), CommandError> {
        self.run_in(dir, &["new", revision])?;
        Ok(())
    }

    /// Create a new commit with the given message.
    pub fn commit(&self, message: &str) -> Result<(), CommandError> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    /// Squash the working copy into its parent.
    pub fn squash(&self) -> Result<(), CommandError> {
        self.run(&["squash"])?;
        Ok(())
    }

    /// Squash changes from one revision into another.
    pub fn squash_into(&self, from: &str, into: &str) -> Result<(), CommandError> {
        self.run(&["squash", "--from", from, "--into", into])?;
        Ok(())
    }

    /// Rebase the current revision onto the destination.
    pub fn rebase(&self, destination: &str) -> Result<(), CommandError> {
        self.run(&["rebase", "-d", destination])?;
        Ok(())
    }

    /// Set or update the description of the working copy.
    pub fn describe(&self, message: &str) -> Result<(), CommandError> {
        self.run(&["describe", "-m", message])?;
        Ok(())
    }

    /// Set or update the description of a specific revision.
    pub fn describe_revision(&self, revision: &str, message: &str) -> Result<(), CommandError> {
        self.run(&["describe", revision, "-m", message])?;
        Ok(())
    }

    /// Push all bookmarks to the remote.
    pub fn git_push(&self) -> Result<(), CommandError> {
        self.run(&["git", "push"])?;
        Ok(())
    }

    /// Push a specific bookmark to the remote.
    pub fn git_push_bookmark(&self, bookmark: &str) -> Result<(), CommandError> {
        self.run(&["git", "push", "--bookmark", bookmark])?;
        Ok(())
    }
}
