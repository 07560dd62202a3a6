use crate::model::Affinity;
use crate::surface::Surface;

use super::Annotator;

impl<S: Surface> Annotator<S> {
    /// Unwrap the nearest tagged element around `position`.
    ///
    /// Returns whether anything was removed. Finding no tagged ancestor is not
    /// an error.
    pub fn unmark_ancestor_at(&mut self, position: usize, span_only: bool) -> bool {
        self.with_preserved_selection(|engine| {
            engine.unmark_nearest(position, Affinity::Upstream, span_only)
        })
    }

    pub(super) fn unmark_nearest(
        &mut self,
        position: usize,
        affinity: Affinity,
        span_only: bool,
    ) -> bool {
        let chain = self.surface.ancestors(position, affinity);
        self.unmark_chain(chain, span_only)
    }

    /// Walk `chain` outward and unwrap the first tagged element, together with
    /// every tagged element inside it.
    ///
    /// With `span_only` the walk gives up at block structure, and at a tagged
    /// element that is not a `<span>`.
    pub(super) fn unmark_chain(&mut self, chain: Vec<S::Node>, span_only: bool) -> bool {
        for node in chain {
            let tagged = self.is_tagged(node);
            if !tagged {
                if span_only && self.surface.is_container(node) {
                    break;
                }
                continue;
            }
            if span_only
                && !self
                    .surface
                    .tag(node)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case("span"))
            {
                break;
            }

            let inner: Vec<_> = self
                .surface
                .descendants(node)
                .into_iter()
                .filter(|&n| self.is_tagged(n))
                .collect();
            log::debug!("Unmarking {:?} and {} tagged descendants", node, inner.len());
            for n in inner {
                self.surface.remove_node(n, true);
            }
            self.surface.remove_node(node, true);
            return true;
        }
        false
    }
}
