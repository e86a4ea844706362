//! Query service: the read operations served to callers.
//!
//! Every operation is read-only. Missing records come back as `None` or an
//! empty list, never as an error.

use crate::repository::{ObjRepository, RepoResult};
use crate::resolve;
use crate::types::{ObjRecord, ObjView, Projection, SearchQuery};

/// Resolves stored records into served views
pub struct QueryService<'a, R: ObjRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: ObjRepository + ?Sized> QueryService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    fn view(&self, record: ObjRecord, projection: Projection) -> RepoResult<ObjView> {
        let drop_table = resolve::resolve_drop_table(self.repo, &record)?;
        let drop_tables = resolve::resolve_all_drop_tables(self.repo, &record)?;
        Ok(ObjView::new(record, drop_table, drop_tables).project(projection))
    }

    fn views(&self, records: Vec<ObjRecord>, projection: Projection) -> RepoResult<Vec<ObjView>> {
        records
            .into_iter()
            .map(|record| self.view(record, projection))
            .collect()
    }

    /// Object by record id
    pub fn get_by_id(&self, objid: i64) -> RepoResult<Option<ObjView>> {
        self.repo
            .get_obj(objid)?
            .map(|record| self.view(record, Projection::Full))
            .transpose()
    }

    /// Object by map partition and hash id
    pub fn get_by_map_hash(
        &self,
        map_type: &str,
        map_name: &str,
        hash_id: u32,
    ) -> RepoResult<Option<ObjView>> {
        self.repo
            .get_obj_by_hash(map_type, map_name, hash_id)?
            .map(|record| self.view(record, Projection::Full))
            .transpose()
    }

    /// Generation group of the object at `(map_type, map_name, hash_id)`
    pub fn get_generation_group(
        &self,
        map_type: &str,
        map_name: &str,
        hash_id: u32,
    ) -> RepoResult<Option<Vec<ObjView>>> {
        resolve::gen_group_siblings(self.repo, map_type, map_name, hash_id)?
            .map(|records| self.views(records, Projection::Full))
            .transpose()
    }

    /// Full-text search with the minimal projection.
    ///
    /// An absent or blank `query` returns an empty list.
    pub fn search(
        &self,
        map_type: &str,
        map_name: Option<&str>,
        query: Option<&str>,
        limit: Option<u32>,
        with_map_names: bool,
    ) -> RepoResult<Vec<ObjView>> {
        let search = SearchQuery::new(map_type)
            .map_name(map_name)
            .text(query)
            .limit(limit);
        if !search.is_runnable() {
            return Ok(Vec::new());
        }
        let records = self.repo.search(&search)?;
        self.views(records, Projection::Minimal { with_map_names })
    }

    /// Record ids matching a full-text search
    pub fn search_ids(
        &self,
        map_type: &str,
        map_name: Option<&str>,
        query: Option<&str>,
    ) -> RepoResult<Vec<i64>> {
        let search = SearchQuery::new(map_type).map_name(map_name).text(query);
        if !search.is_runnable() {
            return Ok(Vec::new());
        }
        self.repo.search_ids(&search)
    }
}
