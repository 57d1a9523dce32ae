pub mod cv;
pub mod job;

pub use cv::{Award, Certification, CvData, Education, Experience, PersonalInfo, Project, Skills};
pub use job::{JobAnalysis, JobDetails, JobListing, JobSearchRequest};
